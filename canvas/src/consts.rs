//! Shared numeric constants and palette for the patch canvas.

use crate::surface::Color;

// ── Grid defaults ───────────────────────────────────────────────

/// Default grid width in cells.
pub const DEFAULT_GRID_WIDTH: u32 = 48;

/// Default grid height in cells.
pub const DEFAULT_GRID_HEIGHT: u32 = 32;

/// Default cell size in surface pixels.
pub const DEFAULT_SCALE: f64 = 20.0;

/// Default left edge of the grid on the surface. Leaves a small margin.
pub const DEFAULT_ORIGIN_X: f64 = 8.0;

/// Default top edge of the grid on the surface. Leaves room for the mode controls.
pub const DEFAULT_ORIGIN_Y: f64 = 56.0;

/// Default module footprint, in cells.
pub const DEFAULT_FOOTPRINT: u32 = 3;

/// Cell coordinates must fit in the low 16 bits of a packed key.
pub const MAX_GRID_DIM: u32 = 1 << 16;

// ── Controls ────────────────────────────────────────────────────

/// Left edge of the first mode control, in surface pixels.
pub const CONTROL_X: f64 = 8.0;

/// Top edge of the mode controls, in surface pixels.
pub const CONTROL_Y: f64 = 8.0;

pub const CONTROL_WIDTH: f64 = 96.0;
pub const CONTROL_HEIGHT: f64 = 32.0;

/// Horizontal gap between adjacent controls.
pub const CONTROL_GAP: f64 = 8.0;

// ── Strokes ─────────────────────────────────────────────────────

pub const GRID_LINE_WIDTH: f64 = 1.0;
pub const WIRE_WIDTH: f64 = 3.0;
pub const JACK_WIDTH: f64 = 2.0;

/// Inset of a module body from its footprint edge, as a fraction of a cell.
pub const MODULE_INSET: f64 = 0.1;

// ── Palette ─────────────────────────────────────────────────────

pub const GRID_COLOR: Color = Color::rgb(0x40, 0x50, 0x70);
pub const WIRE_COLOR: Color = Color::rgb(0x80, 0x80, 0x80);
pub const MODULE_COLOR: Color = Color::rgb(0xc0, 0xc0, 0xc0);
pub const GUIDE_OK_COLOR: Color = Color::rgba(0x00, 0xc0, 0x00, 0.5);
pub const GUIDE_BAD_COLOR: Color = Color::rgba(0xc0, 0x00, 0x00, 0.5);
pub const CONTROL_COLOR: Color = Color::rgb(0x30, 0x38, 0x48);
pub const CONTROL_ACTIVE_COLOR: Color = Color::rgb(0x50, 0x70, 0xa0);
pub const CONTROL_LABEL_COLOR: Color = Color::rgb(0xe0, 0xe0, 0xe0);
