//! Wire painting: the segment store and the drag-to-paint state machine.
//!
//! A segment is a unit edge between the centers of two 4-adjacent cells. The
//! store keeps horizontal and vertical segments in separate maps keyed by the
//! packed anchor cell, each entry owning the handle of the line drawn for it.
//! A key is present exactly when its line is on the surface.
//!
//! A drag decides once whether it paints or erases: the first edge crossed
//! flips its own state, and every later edge of the same gesture is set to
//! that same value.

#[cfg(test)]
#[path = "wire_test.rs"]
mod wire_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::{WIRE_COLOR, WIRE_WIDTH};
use crate::error::SurfaceError;
use crate::grid::{Cell, Grid, Point};
use crate::handler::{Action, GridHandler};
use crate::input::{DragState, PointerEvent};
use crate::surface::{Layer, LineStyle, RenderSurface};

/// A unit wire edge anchored at its top/left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Segment {
    /// Anchor cell: the left cell of a horizontal segment, the upper cell of a vertical one.
    pub cell: Cell,
    /// `true` joins `cell` to the cell below; `false` to the cell on the right.
    pub vertical: bool,
}

impl Segment {
    #[must_use]
    pub fn new(x: u16, y: u16, vertical: bool) -> Self {
        Self { cell: Cell::new(x, y), vertical }
    }

    /// The cell at the far end from the anchor, if representable.
    #[must_use]
    pub fn far_cell(self) -> Option<Cell> {
        if self.vertical {
            self.cell.y.checked_add(1).map(|y| Cell::new(self.cell.x, y))
        } else {
            self.cell.x.checked_add(1).map(|x| Cell::new(x, self.cell.y))
        }
    }

    /// The segment joining two cells, if they are 4-adjacent.
    ///
    /// Equal, diagonal, and non-neighboring cells yield `None`.
    #[must_use]
    pub fn between(a: Cell, b: Cell) -> Option<Self> {
        let dx = a.x.abs_diff(b.x);
        let dy = a.y.abs_diff(b.y);
        match (dx, dy) {
            (1, 0) => Some(Self { cell: Cell::new(a.x.min(b.x), a.y), vertical: false }),
            (0, 1) => Some(Self { cell: Cell::new(a.x, a.y.min(b.y)), vertical: true }),
            _ => None,
        }
    }
}

fn wire_style() -> LineStyle {
    LineStyle { color: WIRE_COLOR, width: WIRE_WIDTH, round_caps: true }
}

/// Painted wire segments plus the active drag gesture.
#[derive(Debug)]
pub struct WireGrid<H> {
    horizontal: HashMap<u32, H>,
    vertical: HashMap<u32, H>,
    drag: DragState,
    trace_fast_drags: bool,
}

impl<H> WireGrid<H> {
    /// An empty wire grid. With `trace_fast_drags`, moves that skip cells
    /// paint along the pointer's path instead of being ignored.
    #[must_use]
    pub fn new(trace_fast_drags: bool) -> Self {
        Self { horizontal: HashMap::new(), vertical: HashMap::new(), drag: DragState::Idle, trace_fast_drags }
    }

    fn store(&self, vertical: bool) -> &HashMap<u32, H> {
        if vertical { &self.vertical } else { &self.horizontal }
    }

    fn store_mut(&mut self, vertical: bool) -> &mut HashMap<u32, H> {
        if vertical { &mut self.vertical } else { &mut self.horizontal }
    }

    #[must_use]
    pub fn is_segment_set(&self, segment: Segment) -> bool {
        self.store(segment.vertical).contains_key(&segment.cell.pack())
    }

    /// Visual handle of a painted segment.
    #[must_use]
    pub fn handle(&self, segment: Segment) -> Option<&H> {
        self.store(segment.vertical).get(&segment.cell.pack())
    }

    /// Number of painted segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.horizontal.len() + self.vertical.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All painted segments, horizontal first, each group in packed-key order.
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        let collect = |store: &HashMap<u32, H>, vertical: bool| {
            let mut keys: Vec<u32> = store.keys().copied().collect();
            keys.sort_unstable();
            keys.into_iter().map(move |k| Segment { cell: Cell::unpack(k), vertical })
        };
        collect(&self.horizontal, false).chain(collect(&self.vertical, true)).collect()
    }

    /// Current gesture state.
    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.drag
    }
}

impl<H: Clone> WireGrid<H> {
    /// Paint (`present`) or erase a segment. Returns whether anything changed.
    ///
    /// Setting a segment to its current state, or naming a segment that does
    /// not lie inside the grid, is a no-op. A change costs exactly one surface
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the mutation; the store is left untouched.
    pub fn set_segment<S>(
        &mut self,
        grid: &Grid,
        surface: &mut S,
        segment: Segment,
        present: bool,
    ) -> Result<bool, SurfaceError>
    where
        S: RenderSurface<Handle = H>,
    {
        let key = segment.cell.pack();
        if self.store(segment.vertical).contains_key(&key) == present {
            return Ok(false);
        }

        if present {
            let Some(far) = segment.far_cell().filter(|c| grid.contains(*c) && grid.contains(segment.cell)) else {
                tracing::debug!(x = segment.cell.x, y = segment.cell.y, "segment outside grid ignored");
                return Ok(false);
            };
            let handle =
                surface.create_line(Layer::Wires, grid.cell_center(segment.cell), grid.cell_center(far), &wire_style())?;
            self.store_mut(segment.vertical).insert(key, handle);
        } else {
            if let Some(handle) = self.store(segment.vertical).get(&key) {
                surface.remove(handle.clone())?;
            }
            self.store_mut(segment.vertical).remove(&key);
        }

        tracing::debug!(
            x = segment.cell.x,
            y = segment.cell.y,
            vertical = segment.vertical,
            present,
            "wire segment set"
        );
        Ok(true)
    }

    /// Apply the latched paint value along a chain of cells, latching it
    /// first if the gesture has not crossed an edge yet.
    ///
    /// Stops at the first surface failure and returns it next to the edits
    /// already applied.
    fn paint_path<S>(
        &mut self,
        grid: &Grid,
        surface: &mut S,
        path: &[Cell],
        paint: &mut Option<bool>,
    ) -> (Vec<Action>, Option<SurfaceError>)
    where
        S: RenderSurface<Handle = H>,
    {
        let mut actions = Vec::new();
        for pair in path.windows(2) {
            let Some(segment) = Segment::between(pair[0], pair[1]) else {
                continue;
            };
            let present = *paint.get_or_insert_with(|| !self.is_segment_set(segment));
            match self.set_segment(grid, surface, segment, present) {
                Ok(true) => actions.push(Action::WireChanged { segment, present }),
                Ok(false) => {}
                Err(err) => return (actions, Some(err)),
            }
        }
        (actions, None)
    }
}

impl<S: RenderSurface> GridHandler<S> for WireGrid<S::Handle> {
    fn on_pointer_down(&mut self, grid: &Grid, _surface: &mut S, event: &PointerEvent) -> Result<Vec<Action>, SurfaceError> {
        self.drag = match grid.cell_of_point_event(event) {
            Some(cell) => DragState::Pressed { anchor: cell, last: cell, last_point: event.offset },
            None => DragState::Idle,
        };
        Ok(Vec::new())
    }

    fn on_pointer_move(&mut self, grid: &Grid, surface: &mut S, event: &PointerEvent) -> Result<Vec<Action>, SurfaceError> {
        let (anchor, last, last_point, mut paint) = match self.drag {
            DragState::Idle => return Ok(Vec::new()),
            DragState::Pressed { anchor, last, last_point } => (anchor, last, last_point, None),
            DragState::Dragging { anchor, last, last_point, paint } => (anchor, last, last_point, Some(paint)),
        };
        let Some(cell) = grid.cell_of_point_event(event) else {
            return Ok(Vec::new());
        };

        let actions = if cell == last {
            Vec::new()
        } else {
            let path = self.path(grid, last, cell, last_point, event.offset);
            let (actions, failure) = self.paint_path(grid, surface, &path, &mut paint);
            if let Some(err) = failure {
                tracing::warn!(error = %err, applied = actions.len(), "wire drag aborted");
                self.drag = DragState::Idle;
                // Edits that reached the surface must still be reported.
                return if actions.is_empty() { Err(err) } else { Ok(actions) };
            }
            actions
        };

        self.drag = match paint {
            Some(paint) => DragState::Dragging { anchor, last: cell, last_point: event.offset, paint },
            None => DragState::Pressed { anchor, last: cell, last_point: event.offset },
        };
        Ok(actions)
    }

    fn on_pointer_up(&mut self, _grid: &Grid, _surface: &mut S, _event: &PointerEvent) -> Result<Vec<Action>, SurfaceError> {
        self.drag = DragState::Idle;
        Ok(Vec::new())
    }

    fn cancel(&mut self, _surface: &mut S) -> Result<(), SurfaceError> {
        if self.drag.is_active() {
            tracing::debug!("wire drag canceled");
        }
        self.drag = DragState::Idle;
        Ok(())
    }
}

impl<H> WireGrid<H> {
    /// Cells to paint between for a move from `last` to `cell`.
    fn path(&self, grid: &Grid, last: Cell, cell: Cell, from: Point, to: Point) -> Vec<Cell> {
        if self.trace_fast_drags && Segment::between(last, cell).is_none() {
            grid.cells_along(from, to)
        } else {
            vec![last, cell]
        }
    }
}
