//! The grid interaction handler interface and the actions handlers report.
//!
//! Both the wire painter and the module placer implement [`GridHandler`]. The
//! compositor holds one of each and forwards pointer events to whichever is
//! active, so switching modes is a plain field change rather than a swap of
//! event listeners.

use serde::Serialize;

use crate::error::SurfaceError;
use crate::grid::Grid;
use crate::input::{Mode, PointerEvent};
use crate::module::ModuleInstance;
use crate::surface::RenderSurface;
use crate::wire::Segment;

/// Applied edits, returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// A wire segment was painted (`present`) or erased.
    WireChanged { segment: Segment, present: bool },
    /// A module was appended to the grid.
    ModulePlaced { module: ModuleInstance },
    /// The active handler changed.
    ModeChanged { mode: Mode },
}

/// A pointer-driven editor of grid state.
///
/// Handlers never report invalid input as an error: events outside the grid,
/// redundant toggles and blocked placements are no-ops. `Err` means only that
/// the rendering surface failed before any edit was applied; the handler's
/// state still matches what is on the surface. A failure after some edits
/// landed is logged and the applied edits are returned as `Ok`.
pub trait GridHandler<S: RenderSurface> {
    /// Start of a primary-button gesture.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the rendering surface rejects a mutation.
    fn on_pointer_down(&mut self, grid: &Grid, surface: &mut S, event: &PointerEvent)
    -> Result<Vec<Action>, SurfaceError>;

    /// Pointer motion, with or without a button held.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the rendering surface rejects a mutation.
    fn on_pointer_move(&mut self, grid: &Grid, surface: &mut S, event: &PointerEvent)
    -> Result<Vec<Action>, SurfaceError>;

    /// End of the gesture.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the rendering surface rejects a mutation.
    fn on_pointer_up(&mut self, grid: &Grid, surface: &mut S, event: &PointerEvent)
    -> Result<Vec<Action>, SurfaceError>;

    /// The pointer left the surface.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the rendering surface rejects a mutation.
    fn on_pointer_leave(&mut self, _surface: &mut S) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Drop any in-progress gesture and transient visuals. Called on the
    /// outgoing handler when the mode changes.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the rendering surface rejects a mutation.
    fn cancel(&mut self, surface: &mut S) -> Result<(), SurfaceError>;
}
