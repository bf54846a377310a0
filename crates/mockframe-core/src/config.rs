//! Editor settings that tune the manipulation engines.

use crate::guides::DEFAULT_GUIDE_THRESHOLD;
use crate::history::MAX_UNDO_HISTORY;
use crate::resize::MIN_ELEMENT_SIZE;
use crate::snap::{DEFAULT_GRID_SIZE, GridSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Pointer travel (screen pixels) before a press becomes a drag or resize.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Snap positions and sizes to the grid.
    pub grid_enabled: bool,
    /// Grid cell size in mockup units.
    pub grid_size: f64,
    /// Propose alignment guides while dragging.
    pub guides_enabled: bool,
    /// Alignment distance in screen pixels.
    pub guide_threshold: f64,
    /// Pointer travel in screen pixels before a gesture activates.
    pub drag_threshold: f64,
    /// Smallest width/height a resize may produce.
    pub min_size: f64,
    /// Undo entries kept before the oldest is dropped.
    pub history_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_enabled: false,
            grid_size: DEFAULT_GRID_SIZE,
            guides_enabled: true,
            guide_threshold: DEFAULT_GUIDE_THRESHOLD,
            drag_threshold: DRAG_THRESHOLD,
            min_size: MIN_ELEMENT_SIZE,
            history_capacity: MAX_UNDO_HISTORY,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the engines cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(ConfigError::Invalid(format!("gridSize must be positive, got {}", self.grid_size)));
        }
        if !(self.guide_threshold.is_finite() && self.guide_threshold >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "guideThreshold must be non-negative, got {}",
                self.guide_threshold
            )));
        }
        if !(self.drag_threshold.is_finite() && self.drag_threshold >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "dragThreshold must be non-negative, got {}",
                self.drag_threshold
            )));
        }
        if !(self.min_size.is_finite() && self.min_size >= 0.0) {
            return Err(ConfigError::Invalid(format!("minSize must be non-negative, got {}", self.min_size)));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("historyCapacity must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Grid settings for the engines.
    pub fn grid(&self) -> GridSettings {
        GridSettings {
            enabled: self.grid_enabled,
            size: self.grid_size,
        }
    }
}
