//! Selection state for the editing session.

use crate::geometry::ElementId;
use std::fmt;

/// Callback fired after every selection change with the most recently touched id.
pub type SelectListener = Box<dyn FnMut(Option<&ElementId>)>;

/// Tracks which elements are selected, in insertion order.
#[derive(Default)]
pub struct SelectionState {
    selected: Vec<ElementId>,
    listeners: Vec<SelectListener>,
}

impl fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("selected", &self.selected)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SelectionState {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `select` notifications.
    pub fn on_select(&mut self, listener: SelectListener) {
        self.listeners.push(listener);
    }

    fn notify(&mut self, id: Option<&ElementId>) {
        log::debug!("selection -> {:?} ({} selected)", id.map(ElementId::as_str), self.selected.len());
        for listener in &mut self.listeners {
            listener(id);
        }
    }

    /// Select an element.
    ///
    /// Non-additive selection replaces the set with `id`, or empties it when
    /// `id` is `None` or empty. Additive selection toggles `id`'s membership.
    pub fn select(&mut self, id: Option<ElementId>, additive: bool) {
        let id = id.filter(|id| !id.is_empty());
        if additive {
            let Some(id) = id else { return };
            match self.selected.iter().position(|s| *s == id) {
                Some(index) => {
                    self.selected.remove(index);
                }
                None => self.selected.push(id.clone()),
            }
            self.notify(Some(&id));
        } else {
            self.selected.clear();
            if let Some(id) = &id {
                self.selected.push(id.clone());
            }
            self.notify(id.as_ref());
        }
    }

    /// Remove a single element from the selection.
    pub fn deselect(&mut self, id: &ElementId) {
        let before = self.selected.len();
        self.selected.retain(|s| s != id);
        if self.selected.len() != before {
            self.notify(Some(id));
        }
    }

    /// Replace the selection with all given ids (duplicates dropped).
    pub fn select_all<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ElementId>,
    {
        self.selected.clear();
        for id in ids {
            if !id.is_empty() && !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
        let last = self.selected.last().cloned();
        self.notify(last.as_ref());
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.select(None, false);
    }

    /// Check if an element is selected.
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected.contains(id)
    }

    /// Number of selected elements.
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Copy of the selected ids in insertion order.
    pub fn selected_ids(&self) -> Vec<ElementId> {
        self.selected.clone()
    }

    /// First selected id, for single-selection callers.
    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selected.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn id(s: &str) -> ElementId {
        ElementId::new(s)
    }

    #[test]
    fn test_single_select_replaces() {
        let mut selection = SelectionState::new();
        selection.select(Some(id("a")), false);
        selection.select(Some(id("b")), false);
        assert_eq!(selection.selected_ids(), vec![id("b")]);
        assert!(selection.is_selected(&id("b")));
        assert!(!selection.is_selected(&id("a")));
    }

    #[test]
    fn test_select_none_or_empty_clears() {
        let mut selection = SelectionState::new();
        selection.select(Some(id("a")), false);
        selection.select(None, false);
        assert_eq!(selection.count(), 0);

        selection.select(Some(id("a")), false);
        selection.select(Some(id("")), false);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_additive_toggles() {
        let mut selection = SelectionState::new();
        selection.select(Some(id("a")), false);
        selection.select(Some(id("b")), true);
        selection.select(Some(id("c")), true);
        assert_eq!(selection.count(), 3);

        selection.select(Some(id("b")), true);
        assert_eq!(selection.selected_ids(), vec![id("a"), id("c")]);
        assert_eq!(selection.selected_id(), Some(&id("a")));
    }

    #[test]
    fn test_selected_ids_is_a_copy() {
        let mut selection = SelectionState::new();
        selection.select(Some(id("a")), false);
        let mut ids = selection.selected_ids();
        ids.push(id("z"));
        assert_eq!(selection.count(), 1);
    }

    #[test]
    fn test_notifications() {
        let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut selection = SelectionState::new();
        selection.on_select(Box::new(move |id| {
            sink.borrow_mut().push(id.map(|id| id.to_string()));
        }));

        selection.select(Some(id("a")), false);
        selection.select(Some(id("b")), true);
        selection.select(Some(id("a")), true);
        selection.clear();
        // Additive with nothing to toggle is not a mutation
        selection.select(None, true);

        assert_eq!(
            *seen.borrow(),
            vec![Some("a".to_string()), Some("b".to_string()), Some("a".to_string()), None]
        );
    }

    #[test]
    fn test_select_all_and_deselect() {
        let mut selection = SelectionState::new();
        selection.select_all([id("a"), id("b"), id("a"), id("c")]);
        assert_eq!(selection.selected_ids(), vec![id("a"), id("b"), id("c")]);

        selection.deselect(&id("b"));
        assert_eq!(selection.selected_ids(), vec![id("a"), id("c")]);
    }
}
