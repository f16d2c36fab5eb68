//! Error types for grid configuration and rendering-surface failures.
//!
//! Interaction itself never fails: out-of-bounds pointers, redundant toggles
//! and blocked placements are silently rejected. Errors only arise from a bad
//! configuration or from the rendering surface refusing a mutation.

/// Error returned when a [`crate::config::GridConfig`] cannot become a grid.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The host-supplied JSON did not deserialize.
    #[error("failed to parse grid config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A grid dimension is zero or does not fit a packed cell key.
    #[error("grid dimensions must be between 1 and {max}, got {width}x{height}")]
    Dimensions { width: u32, height: u32, max: u32 },
    /// Cell size is zero, negative, or not finite.
    #[error("scale must be a positive finite number, got {0}")]
    Scale(f64),
    /// Grid origin is not finite.
    #[error("grid origin must be finite, got ({x}, {y})")]
    Origin { x: f64, y: f64 },
    /// The grid area would lie under the mode controls.
    #[error("grid at ({x}, {y}) overlaps the mode controls; place it below y = {controls_bottom}")]
    ControlsOverlap { x: f64, y: f64, controls_bottom: f64 },
    /// Module footprint is empty or larger than the grid.
    #[error("footprint {width}x{height} does not fit a {grid_width}x{grid_height} grid")]
    Footprint { width: u32, height: u32, grid_width: u32, grid_height: u32 },
}

/// Error returned by a [`crate::surface::RenderSurface`] mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The backend refused the operation.
    #[error("rendering surface failed to {op}: {message}")]
    Backend { op: &'static str, message: String },
    /// The handle does not name a live primitive.
    #[error("unknown primitive handle")]
    UnknownHandle,
}

/// Error returned while building the compositor.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
