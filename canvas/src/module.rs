//! Module placement: the placed-module list, collision checks, and the
//! live placement guide.
//!
//! Modules are append-only rectangles of the grid's fixed footprint. The
//! overlap test is inclusive, so two modules may not even share an edge; this
//! keeps a free column/row between neighbors for their jack stubs.

#[cfg(test)]
#[path = "module_test.rs"]
mod module_test;

use serde::{Deserialize, Serialize};

use crate::config::FootprintConfig;
use crate::consts::{GUIDE_BAD_COLOR, GUIDE_OK_COLOR, JACK_WIDTH, MODULE_COLOR, MODULE_INSET};
use crate::error::SurfaceError;
use crate::grid::{Cell, Grid, Point};
use crate::handler::{Action, GridHandler};
use crate::input::PointerEvent;
use crate::surface::{Color, FillStyle, Layer, LineStyle, Rect, RenderSurface, TextStyle};

/// Kind and size of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub name: String,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
}

impl From<&FootprintConfig> for ModuleSpec {
    fn from(fp: &FootprintConfig) -> Self {
        Self { name: fp.name.clone(), width: fp.width, height: fp.height }
    }
}

/// A module placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInstance {
    /// Top-left cell.
    pub cell: Cell,
    pub spec: ModuleSpec,
}

impl ModuleInstance {
    /// Inclusive bounding-box overlap with a `width` x `height` block at `cell`.
    /// Blocks that merely touch count as overlapping.
    #[must_use]
    pub fn conflicts_with(&self, cell: Cell, width: u32, height: u32) -> bool {
        let (ax, ay) = (u32::from(self.cell.x), u32::from(self.cell.y));
        let (bx, by) = (u32::from(cell.x), u32::from(cell.y));
        ax + self.spec.width >= bx && bx + width >= ax && ay + self.spec.height >= by && by + height >= ay
    }
}

#[derive(Debug)]
struct Placed<H> {
    instance: ModuleInstance,
    visuals: Vec<H>,
}

/// Placed modules plus the placement guide.
#[derive(Debug)]
pub struct ModuleGrid<H> {
    footprint: ModuleSpec,
    modules: Vec<Placed<H>>,
    guide: Option<H>,
}

impl<H> ModuleGrid<H> {
    /// An empty module grid stamping `footprint`.
    #[must_use]
    pub fn new(footprint: ModuleSpec) -> Self {
        Self { footprint, modules: Vec::new(), guide: None }
    }

    #[must_use]
    pub fn footprint(&self) -> &ModuleSpec {
        &self.footprint
    }

    /// Placed modules in z-order, bottom first.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleInstance> {
        self.modules.iter().map(|p| &p.instance)
    }

    /// Visual handles of the module at `index`.
    #[must_use]
    pub fn visuals(&self, index: usize) -> Option<&[H]> {
        self.modules.get(index).map(|p| p.visuals.as_slice())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Handle of the placement guide, while shown.
    #[must_use]
    pub fn guide(&self) -> Option<&H> {
        self.guide.as_ref()
    }

    /// Top-left cell for a footprint centered under the pointer.
    #[must_use]
    pub fn cell_of_pointer_for_placement(&self, grid: &Grid, event: &PointerEvent) -> Option<Cell> {
        let (dx, dy) = self.half_footprint_px(grid);
        grid.cell_of_point(event.offset.offset(-dx, -dy))
    }

    /// Whether the footprint can go at `cell`: inside the grid and clear of
    /// every placed module.
    #[must_use]
    pub fn can_place(&self, grid: &Grid, cell: Option<Cell>) -> bool {
        let Some(cell) = cell else {
            return false;
        };
        let (w, h) = (self.footprint.width, self.footprint.height);
        grid.fits(cell, w, h) && !self.modules.iter().any(|p| p.instance.conflicts_with(cell, w, h))
    }

    /// Guide outline: the footprint centered on the pointer, unsnapped.
    #[must_use]
    pub fn guide_rect(&self, grid: &Grid, pointer: Point) -> Rect {
        let (dx, dy) = self.half_footprint_px(grid);
        Rect::new(pointer.x - dx, pointer.y - dy, dx * 2.0, dy * 2.0)
    }

    fn half_footprint_px(&self, grid: &Grid) -> (f64, f64) {
        (
            f64::from(self.footprint.width) * grid.scale() * 0.5,
            f64::from(self.footprint.height) * grid.scale() * 0.5,
        )
    }
}

fn guide_style(ok: bool) -> FillStyle {
    FillStyle::solid(if ok { GUIDE_OK_COLOR } else { GUIDE_BAD_COLOR })
}

/// Draw a module body, its name, and a jack stub on each side of every row.
fn draw_module<S: RenderSurface>(
    grid: &Grid,
    surface: &mut S,
    instance: &ModuleInstance,
    out: &mut Vec<S::Handle>,
) -> Result<(), SurfaceError> {
    let s = grid.scale();
    let origin = grid.cell_origin(instance.cell);
    let (w, h) = (f64::from(instance.spec.width), f64::from(instance.spec.height));
    let body = Rect::new(
        origin.x + MODULE_INSET * s,
        origin.y + MODULE_INSET * s,
        (w - 2.0 * MODULE_INSET) * s,
        (h - 2.0 * MODULE_INSET) * s,
    );
    out.push(surface.create_rect(Layer::Modules, body, &FillStyle::solid(MODULE_COLOR))?);

    let jack = LineStyle { color: MODULE_COLOR, width: JACK_WIDTH, round_caps: false };
    let reach = (0.5 + MODULE_INSET) * s;
    let (left, right) = (body.x, body.x + body.width);
    for row in 0..instance.spec.height {
        let y = origin.y + (f64::from(row) + 0.5) * s;
        out.push(surface.create_line(Layer::Modules, Point::new(left, y), Point::new(left - reach, y), &jack)?);
        out.push(surface.create_line(Layer::Modules, Point::new(right, y), Point::new(right + reach, y), &jack)?);
    }

    let label = TextStyle { color: Color::rgb(0x20, 0x20, 0x20), size: (s * 0.6).max(8.0) };
    out.push(surface.create_text(Layer::Modules, body.center(), &instance.spec.name, &label)?);
    Ok(())
}

impl<H: Clone> ModuleGrid<H> {
    /// Render a module, removing any primitives already drawn if one fails.
    fn render<S>(grid: &Grid, surface: &mut S, instance: &ModuleInstance) -> Result<Vec<H>, SurfaceError>
    where
        S: RenderSurface<Handle = H>,
    {
        let mut visuals = Vec::new();
        if let Err(err) = draw_module(grid, surface, instance, &mut visuals) {
            for handle in visuals.into_iter().rev() {
                if let Err(e) = surface.remove(handle) {
                    tracing::warn!(error = %e, "failed to roll back module primitive");
                }
            }
            return Err(err);
        }
        Ok(visuals)
    }

    /// Place the footprint at `cell` if allowed. Returns the new instance.
    ///
    /// # Errors
    ///
    /// Returns `Err` if rendering fails; nothing is placed in that case.
    pub fn place<S>(&mut self, grid: &Grid, surface: &mut S, cell: Option<Cell>) -> Result<Option<ModuleInstance>, SurfaceError>
    where
        S: RenderSurface<Handle = H>,
    {
        if !self.can_place(grid, cell) {
            tracing::debug!(?cell, "module placement rejected");
            return Ok(None);
        }
        let Some(cell) = cell else {
            return Ok(None);
        };
        let instance = ModuleInstance { cell, spec: self.footprint.clone() };
        let visuals = Self::render(grid, surface, &instance)?;
        self.modules.push(Placed { instance: instance.clone(), visuals });
        tracing::debug!(x = cell.x, y = cell.y, name = %instance.spec.name, "module placed");
        Ok(Some(instance))
    }

    /// Create or move the guide to follow `pointer`, colored by placeability.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the create or update.
    pub fn show_guide<S>(&mut self, grid: &Grid, surface: &mut S, event: &PointerEvent) -> Result<(), SurfaceError>
    where
        S: RenderSurface<Handle = H>,
    {
        let ok = self.can_place(grid, self.cell_of_pointer_for_placement(grid, event));
        let rect = self.guide_rect(grid, event.offset);
        let style = guide_style(ok);
        if let Some(handle) = &self.guide {
            return surface.update_rect(handle, rect, &style);
        }
        self.guide = Some(surface.create_rect(Layer::Guide, rect, &style)?);
        Ok(())
    }

    /// Remove the guide if shown.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the removal; the guide is kept.
    pub fn hide_guide<S>(&mut self, surface: &mut S) -> Result<(), SurfaceError>
    where
        S: RenderSurface<Handle = H>,
    {
        if let Some(handle) = self.guide.take() {
            if let Err(err) = surface.remove(handle.clone()) {
                self.guide = Some(handle);
                return Err(err);
            }
        }
        Ok(())
    }
}

impl<S: RenderSurface> GridHandler<S> for ModuleGrid<S::Handle> {
    fn on_pointer_down(&mut self, grid: &Grid, surface: &mut S, event: &PointerEvent) -> Result<Vec<Action>, SurfaceError> {
        let cell = self.cell_of_pointer_for_placement(grid, event);
        let Some(module) = self.place(grid, surface, cell)? else {
            return Ok(Vec::new());
        };
        // The spot under the pointer is now taken.
        if let Err(err) = self.show_guide(grid, surface, event) {
            tracing::warn!(error = %err, "failed to refresh placement guide");
        }
        Ok(vec![Action::ModulePlaced { module }])
    }

    fn on_pointer_move(&mut self, grid: &Grid, surface: &mut S, event: &PointerEvent) -> Result<Vec<Action>, SurfaceError> {
        self.show_guide(grid, surface, event)?;
        Ok(Vec::new())
    }

    fn on_pointer_up(&mut self, _grid: &Grid, _surface: &mut S, _event: &PointerEvent) -> Result<Vec<Action>, SurfaceError> {
        Ok(Vec::new())
    }

    fn on_pointer_leave(&mut self, surface: &mut S) -> Result<(), SurfaceError> {
        self.hide_guide(surface)
    }

    fn cancel(&mut self, surface: &mut S) -> Result<(), SurfaceError> {
        self.hide_guide(surface)
    }
}
