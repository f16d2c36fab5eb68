//! Input model: interaction modes, mouse buttons, pointer events, and the
//! wire-painting gesture state machine.
//!
//! `Mode` captures which handler receives pointer events. `PointerEvent` is a
//! host-neutral pointer sample already expressed in the rendering surface's
//! local coordinates. `DragState` is the active gesture tracked between
//! pointer-down and pointer-up, carrying what the wire handler needs to turn
//! the next move into a segment edit.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Point};

/// Which interaction handler is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Paint and erase wire segments by dragging.
    Wire,
    /// Stamp modules onto free space.
    #[default]
    Module,
}

impl Mode {
    /// The mode a middle-click switches to.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Wire => Self::Module,
            Self::Module => Self::Wire,
        }
    }

    /// Parse a mode name as used by the host (`"wire"` / `"module"`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "wire" => Some(Self::Wire),
            "module" => Some(Self::Module),
            _ => None,
        }
    }

    /// Label shown on the control bound to this mode.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Wire => "Wire",
            Self::Module => "Module",
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A pointer sample relative to the rendering surface's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Offset from the surface's top-left corner, in pixels.
    pub offset: Point,
    /// Button that changed state; `Primary` for plain moves.
    pub button: Button,
}

impl PointerEvent {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { offset: Point::new(x, y), button: Button::Primary }
    }

    #[must_use]
    pub fn with_button(self, button: Button) -> Self {
        Self { button, ..self }
    }
}

/// State of the wire-painting gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pointer is down but no edge has been crossed yet.
    Pressed {
        /// Cell under the pointer at pointer-down.
        anchor: Cell,
        /// Most recent cell the pointer was in.
        last: Cell,
        /// Surface position of the previous event, for path tracing.
        last_point: Point,
    },
    /// At least one edge has been crossed; the paint/erase decision is latched.
    Dragging {
        /// Cell under the pointer at pointer-down.
        anchor: Cell,
        /// Most recent cell the pointer was in.
        last: Cell,
        /// Surface position of the previous event, for path tracing.
        last_point: Point,
        /// `true` paints segments, `false` erases them.
        paint: bool,
    },
}

impl DragState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// The cell the gesture started in.
    #[must_use]
    pub fn anchor(&self) -> Option<Cell> {
        match *self {
            Self::Idle => None,
            Self::Pressed { anchor, .. } | Self::Dragging { anchor, .. } => Some(anchor),
        }
    }

    /// The latched paint value, once the first edge has been crossed.
    #[must_use]
    pub fn paint(&self) -> Option<bool> {
        match *self {
            Self::Dragging { paint, .. } => Some(paint),
            _ => None,
        }
    }
}
