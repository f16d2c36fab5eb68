//! Conversion of DOM pointer input into canvas events.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use patch_canvas::{Button, PointerEvent};

/// DOM `PointerEvent.button` to a canvas button.
pub fn map_button(button: i16) -> Button {
    match button {
        1 => Button::Middle,
        2 => Button::Secondary,
        _ => Button::Primary,
    }
}

/// A pointer event in surface coordinates, given client coordinates and the
/// surface's top-left corner in client space.
pub fn surface_event(client_x: i32, client_y: i32, left: f64, top: f64, button: i16) -> PointerEvent {
    PointerEvent::new(f64::from(client_x) - left, f64::from(client_y) - top).with_button(map_button(button))
}

/// DOM pointer event types the patcher listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
    Leave,
}

impl PointerKind {
    pub const ALL: [PointerKind; 5] = [Self::Down, Self::Move, Self::Up, Self::Cancel, Self::Leave];

    /// DOM event name.
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::Down => "pointerdown",
            Self::Move => "pointermove",
            Self::Up => "pointerup",
            Self::Cancel => "pointercancel",
            Self::Leave => "pointerleave",
        }
    }
}
