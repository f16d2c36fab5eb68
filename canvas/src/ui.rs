//! The compositor: owns the grid, both handlers, the mode controls, and the
//! rendering surface, and routes pointer events to the active handler.
//!
//! `Ui` has no browser dependency. The web host wraps it, feeds it pointer
//! events in surface coordinates, and forwards the returned [`Action`]s.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use crate::config::GridConfig;
use crate::consts::{
    CONTROL_ACTIVE_COLOR, CONTROL_COLOR, CONTROL_GAP, CONTROL_HEIGHT, CONTROL_LABEL_COLOR, CONTROL_WIDTH, CONTROL_X,
    CONTROL_Y, GRID_COLOR, GRID_LINE_WIDTH,
};
use crate::error::{CanvasError, ConfigError, SurfaceError};
use crate::grid::{Grid, Point};
use crate::handler::{Action, GridHandler};
use crate::input::{Button, Mode, PointerEvent};
use crate::module::{ModuleGrid, ModuleSpec};
use crate::surface::{FillStyle, Layer, LineStyle, Rect, RenderSurface, TextStyle};
use crate::wire::WireGrid;

/// A mode button drawn on the surface.
#[derive(Debug)]
pub struct Control<H> {
    mode: Mode,
    bounds: Rect,
    background: H,
    label: H,
}

impl<H> Control<H> {
    /// The mode this control activates.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Hit box on the surface.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Handle of the label primitive.
    #[must_use]
    pub fn label(&self) -> &H {
        &self.label
    }
}

/// Area covered by the mode controls.
fn controls_strip() -> Rect {
    Rect::new(CONTROL_X, CONTROL_Y, 2.0 * CONTROL_WIDTH + CONTROL_GAP, CONTROL_HEIGHT)
}

/// Reject a grid whose cells would sit under a control hit box.
fn check_layout(grid: &Grid) -> Result<(), ConfigError> {
    let o = grid.origin();
    let area = Rect::new(
        o.x,
        o.y,
        f64::from(grid.width()) * grid.scale(),
        f64::from(grid.height()) * grid.scale(),
    );
    let strip = controls_strip();
    if area.intersects(&strip) {
        return Err(ConfigError::ControlsOverlap { x: o.x, y: o.y, controls_bottom: strip.y + strip.height });
    }
    Ok(())
}

fn control_style(active: bool) -> FillStyle {
    FillStyle { fill: if active { CONTROL_ACTIVE_COLOR } else { CONTROL_COLOR }, stroke: Some(GRID_COLOR) }
}

/// Interactive patch grid.
pub struct Ui<S: RenderSurface> {
    grid: Grid,
    surface: S,
    wires: WireGrid<S::Handle>,
    modules: ModuleGrid<S::Handle>,
    mode: Mode,
    controls: Vec<Control<S::Handle>>,
    grid_lines: Vec<S::Handle>,
    /// Set while a gesture that started on a control is in progress.
    control_gesture: bool,
}

impl<S: RenderSurface> Ui<S> {
    /// Build the compositor and draw the empty grid and its controls.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Config`] for an invalid config, or
    /// [`CanvasError::Surface`] if the initial drawing fails.
    pub fn new(config: &GridConfig, surface: S) -> Result<Self, CanvasError> {
        let grid = Grid::new(config)?;
        check_layout(&grid)?;
        let mut ui = Self {
            wires: WireGrid::new(config.trace_fast_drags),
            modules: ModuleGrid::new(ModuleSpec::from(&config.footprint)),
            mode: Mode::default(),
            controls: Vec::new(),
            grid_lines: Vec::new(),
            control_gesture: false,
            grid,
            surface,
        };
        ui.draw_grid_lines()?;
        ui.draw_controls()?;
        tracing::info!(
            width = ui.grid.width(),
            height = ui.grid.height(),
            scale = ui.grid.scale(),
            mode = ?ui.mode,
            "patch grid ready"
        );
        Ok(ui)
    }

    fn draw_grid_lines(&mut self) -> Result<(), SurfaceError> {
        let style = LineStyle { color: GRID_COLOR, width: GRID_LINE_WIDTH, round_caps: false };
        let o = self.grid.origin();
        let s = self.grid.scale();
        let right = o.x + f64::from(self.grid.width()) * s;
        let bottom = o.y + f64::from(self.grid.height()) * s;
        for i in 0..=self.grid.width() {
            let x = o.x + f64::from(i) * s;
            let h = self.surface.create_line(Layer::Grid, Point::new(x, o.y), Point::new(x, bottom), &style)?;
            self.grid_lines.push(h);
        }
        for j in 0..=self.grid.height() {
            let y = o.y + f64::from(j) * s;
            let h = self.surface.create_line(Layer::Grid, Point::new(o.x, y), Point::new(right, y), &style)?;
            self.grid_lines.push(h);
        }
        Ok(())
    }

    fn draw_controls(&mut self) -> Result<(), SurfaceError> {
        let text = TextStyle { color: CONTROL_LABEL_COLOR, size: CONTROL_HEIGHT * 0.45 };
        let mut x = CONTROL_X;
        for mode in [Mode::Wire, Mode::Module] {
            let bounds = Rect::new(x, CONTROL_Y, CONTROL_WIDTH, CONTROL_HEIGHT);
            let background = self.surface.create_rect(Layer::Controls, bounds, &control_style(mode == self.mode))?;
            let label = self.surface.create_text(Layer::Controls, bounds.center(), mode.label(), &text)?;
            self.controls.push(Control { mode, bounds, background, label });
            x += CONTROL_WIDTH + CONTROL_GAP;
        }
        Ok(())
    }

    fn restyle_controls(&mut self) -> Result<(), SurfaceError> {
        for control in &self.controls {
            self.surface.update_rect(&control.background, control.bounds, &control_style(control.mode == self.mode))?;
        }
        Ok(())
    }

    /// The active handler, with the grid and surface it works against.
    fn active(&mut self) -> (&mut dyn GridHandler<S>, &Grid, &mut S) {
        let handler: &mut dyn GridHandler<S> = match self.mode {
            Mode::Wire => &mut self.wires,
            Mode::Module => &mut self.modules,
        };
        (handler, &self.grid, &mut self.surface)
    }

    /// The control whose hit box contains `pt`.
    #[must_use]
    pub fn control_at(&self, pt: Point) -> Option<Mode> {
        self.controls.iter().find(|c| c.bounds.contains(pt)).map(|c| c.mode)
    }

    // --- Mode ---

    /// Make `mode` active. The outgoing handler's gesture and guide are
    /// dropped first. Selecting the current mode is a no-op.
    ///
    /// Once the mode has switched the change is always reported; a failure
    /// to restyle the controls afterwards is only logged.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the outgoing handler cannot be canceled; the mode is
    /// unchanged in that case.
    pub fn set_mode(&mut self, mode: Mode) -> Result<Vec<Action>, SurfaceError> {
        if mode == self.mode {
            return Ok(Vec::new());
        }
        let (outgoing, _, surface) = self.active();
        outgoing.cancel(surface)?;
        self.mode = mode;
        tracing::info!(?mode, "mode changed");
        if let Err(err) = self.restyle_controls() {
            tracing::warn!(error = %err, "failed to restyle mode controls");
        }
        Ok(vec![Action::ModeChanged { mode }])
    }

    /// Switch to the other mode.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects a mutation.
    pub fn cycle_mode(&mut self) -> Result<Vec<Action>, SurfaceError> {
        self.set_mode(self.mode.next())
    }

    // --- Input events ---

    /// Pointer pressed. Middle-click cycles the mode, a primary press on a
    /// control activates it, any other primary press goes to the active handler.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects a mutation.
    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> Result<Vec<Action>, SurfaceError> {
        match event.button {
            Button::Middle => return self.cycle_mode(),
            Button::Secondary => return Ok(Vec::new()),
            Button::Primary => {}
        }
        if let Some(mode) = self.control_at(event.offset) {
            self.control_gesture = true;
            return self.set_mode(mode);
        }
        let (handler, grid, surface) = self.active();
        handler.on_pointer_down(grid, surface, event)
    }

    /// Pointer moved.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects a mutation.
    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> Result<Vec<Action>, SurfaceError> {
        if self.control_gesture {
            return Ok(Vec::new());
        }
        let (handler, grid, surface) = self.active();
        handler.on_pointer_move(grid, surface, event)
    }

    /// Pointer released.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects a mutation.
    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> Result<Vec<Action>, SurfaceError> {
        if std::mem::take(&mut self.control_gesture) {
            return Ok(Vec::new());
        }
        let (handler, grid, surface) = self.active();
        handler.on_pointer_up(grid, surface, event)
    }

    /// Pointer left the surface.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects a mutation.
    pub fn on_pointer_leave(&mut self) -> Result<(), SurfaceError> {
        let (handler, _, surface) = self.active();
        handler.on_pointer_leave(surface)
    }

    // --- Queries ---

    /// The active mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn wires(&self) -> &WireGrid<S::Handle> {
        &self.wires
    }

    #[must_use]
    pub fn modules(&self) -> &ModuleGrid<S::Handle> {
        &self.modules
    }

    #[must_use]
    pub fn controls(&self) -> &[Control<S::Handle>] {
        &self.controls
    }

    /// Number of background grid lines drawn.
    #[must_use]
    pub fn grid_line_count(&self) -> usize {
        self.grid_lines.len()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}
