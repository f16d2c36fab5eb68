//! Grid configuration supplied by the host.
//!
//! Every field has a default, so the host may pass `{}` or a partial object
//! such as `{"width": 24, "height": 16}`. A config only becomes usable after
//! [`GridConfig::validate`] succeeds, which [`crate::grid::Grid::new`] runs.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_FOOTPRINT, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_ORIGIN_X, DEFAULT_ORIGIN_Y, DEFAULT_SCALE,
    MAX_GRID_DIM,
};
use crate::error::ConfigError;

pub const DEFAULT_MODULE_NAME: &str = "module";

/// The module spec stamped by the module tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootprintConfig {
    /// Name given to placed modules.
    pub name: String,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
}

impl Default for FootprintConfig {
    fn default() -> Self {
        Self { name: DEFAULT_MODULE_NAME.to_string(), width: DEFAULT_FOOTPRINT, height: DEFAULT_FOOTPRINT }
    }
}

/// Layout and behavior of a patch grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
    /// Pixels per cell.
    pub scale: f64,
    /// Left edge of the grid on the surface, in pixels.
    pub origin_x: f64,
    /// Top edge of the grid on the surface, in pixels.
    pub origin_y: f64,
    /// Module placement footprint.
    pub footprint: FootprintConfig,
    /// Paint along the whole pointer path when a move skips cells.
    pub trace_fast_drags: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            scale: DEFAULT_SCALE,
            origin_x: DEFAULT_ORIGIN_X,
            origin_y: DEFAULT_ORIGIN_Y,
            footprint: FootprintConfig::default(),
            trace_fast_drags: false,
        }
    }
}

impl GridConfig {
    /// Parse a config from host JSON, filling absent fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or any validation error.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that the config describes a usable grid.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dim_ok = |d: u32| d > 0 && d < MAX_GRID_DIM;
        if !dim_ok(self.width) || !dim_ok(self.height) {
            return Err(ConfigError::Dimensions { width: self.width, height: self.height, max: MAX_GRID_DIM - 1 });
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::Scale(self.scale));
        }
        if !self.origin_x.is_finite() || !self.origin_y.is_finite() {
            return Err(ConfigError::Origin { x: self.origin_x, y: self.origin_y });
        }
        let fp = &self.footprint;
        if fp.width == 0 || fp.height == 0 || fp.width > self.width || fp.height > self.height {
            return Err(ConfigError::Footprint {
                width: fp.width,
                height: fp.height,
                grid_width: self.width,
                grid_height: self.height,
            });
        }
        Ok(())
    }
}
