#![allow(clippy::float_cmp)]

use super::*;
use crate::config::FootprintConfig;
use crate::error::ConfigError;
use crate::grid::Cell;
use crate::module::ModuleInstance;
use crate::surface::{MemorySurface, Primitive};
use crate::wire::Segment;

// =============================================================
// Helpers
// =============================================================

fn ui() -> Ui<MemorySurface> {
    Ui::new(&GridConfig::default(), MemorySurface::new()).unwrap()
}

fn ui_in(mode: Mode) -> Ui<MemorySurface> {
    let mut ui = ui();
    ui.set_mode(mode).unwrap();
    ui
}

/// Pointer at the center of a cell on the default grid.
fn at(ui: &Ui<MemorySurface>, x: u16, y: u16) -> PointerEvent {
    let c = ui.grid().cell_center(Cell::new(x, y));
    PointerEvent::new(c.x, c.y)
}

/// Pointer that centers the default 3x3 footprint on top-left cell `(x, y)`.
fn over(ui: &Ui<MemorySurface>, x: u16, y: u16) -> PointerEvent {
    let c = ui.grid().cell_center(Cell::new(x + 1, y + 1));
    PointerEvent::new(c.x, c.y)
}

fn control_event(ui: &Ui<MemorySurface>, mode: Mode) -> PointerEvent {
    let bounds = ui.controls().iter().find(|c| c.mode() == mode).unwrap().bounds();
    let c = bounds.center();
    PointerEvent::new(c.x, c.y)
}

fn control_fill(ui: &Ui<MemorySurface>, mode: Mode) -> crate::surface::Color {
    let (_, prim) = ui
        .surface()
        .layer(Layer::Controls)
        .into_iter()
        .find(|(_, p)| matches!(p, Primitive::Rect { rect, .. } if ui.control_at(rect.center()) == Some(mode)))
        .unwrap();
    match prim {
        Primitive::Rect { style, .. } => style.fill,
        _ => unreachable!(),
    }
}

fn drag(ui: &mut Ui<MemorySurface>, cells: &[(u16, u16)]) -> Vec<Action> {
    let mut actions = Vec::new();
    let first = at(ui, cells[0].0, cells[0].1);
    actions.extend(ui.on_pointer_down(&first).unwrap());
    for &(x, y) in &cells[1..] {
        let ev = at(ui, x, y);
        actions.extend(ui.on_pointer_move(&ev).unwrap());
    }
    let (lx, ly) = cells[cells.len() - 1];
    let last = at(ui, lx, ly);
    actions.extend(ui.on_pointer_up(&last).unwrap());
    actions
}

fn click(ui: &mut Ui<MemorySurface>, ev: PointerEvent) -> Vec<Action> {
    let mut actions = ui.on_pointer_down(&ev).unwrap();
    actions.extend(ui.on_pointer_up(&ev).unwrap());
    actions
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_draws_grid_lines_and_controls() {
    let ui = ui();
    assert_eq!(ui.grid_line_count(), 49 + 33);
    assert_eq!(ui.surface().layer(Layer::Grid).len(), 82);
    assert_eq!(ui.controls().len(), 2);
    // Background and label per control.
    assert_eq!(ui.surface().layer(Layer::Controls).len(), 4);
    assert!(ui.surface().layer(Layer::Wires).is_empty());
    assert!(ui.surface().layer(Layer::Modules).is_empty());
    assert!(ui.wires().is_empty());
    assert!(ui.modules().is_empty());
}

#[test]
fn new_starts_in_module_mode_with_its_control_highlighted() {
    let ui = ui();
    assert_eq!(ui.mode(), Mode::Module);
    assert_eq!(control_fill(&ui, Mode::Module), CONTROL_ACTIVE_COLOR);
    assert_eq!(control_fill(&ui, Mode::Wire), CONTROL_COLOR);
}

#[test]
fn grid_lines_span_the_grid() {
    let ui = Ui::new(
        &GridConfig {
            width: 2,
            height: 1,
            scale: 10.0,
            origin_x: 0.0,
            origin_y: 50.0,
            footprint: FootprintConfig { width: 1, height: 1, ..FootprintConfig::default() },
            ..GridConfig::default()
        },
        MemorySurface::new(),
    )
    .unwrap();
    let lines: Vec<_> = ui
        .surface()
        .layer(Layer::Grid)
        .into_iter()
        .map(|(_, p)| match p {
            Primitive::Line { from, to, .. } => (*from, *to),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(
        lines,
        vec![
            (Point::new(0.0, 50.0), Point::new(0.0, 60.0)),
            (Point::new(10.0, 50.0), Point::new(10.0, 60.0)),
            (Point::new(20.0, 50.0), Point::new(20.0, 60.0)),
            (Point::new(0.0, 50.0), Point::new(20.0, 50.0)),
            (Point::new(0.0, 60.0), Point::new(20.0, 60.0)),
        ]
    );
}

#[test]
fn new_rejects_invalid_config() {
    let cfg = GridConfig { width: 0, ..GridConfig::default() };
    let err = Ui::new(&cfg, MemorySurface::new()).err().unwrap();
    assert!(matches!(err, CanvasError::Config(ConfigError::Dimensions { .. })));
}

#[test]
fn new_rejects_grid_under_controls() {
    let cfg = GridConfig { origin_x: 0.0, origin_y: 0.0, ..GridConfig::default() };
    let err = Ui::new(&cfg, MemorySurface::new()).err().unwrap();
    assert!(matches!(err, CanvasError::Config(ConfigError::ControlsOverlap { controls_bottom, .. }) if controls_bottom == 40.0));

    // Touching the bottom edge of the hit boxes still overlaps.
    let cfg = GridConfig { origin_y: 40.0, ..GridConfig::default() };
    assert!(Ui::new(&cfg, MemorySurface::new()).is_err());
}

#[test]
fn new_accepts_grid_clear_of_controls() {
    let below = GridConfig { origin_x: 0.0, origin_y: 41.0, ..GridConfig::default() };
    assert!(Ui::new(&below, MemorySurface::new()).is_ok());
    let beside = GridConfig { origin_x: 209.0, origin_y: 0.0, ..GridConfig::default() };
    let mut ui = Ui::new(&beside, MemorySurface::new()).unwrap();

    // Every cell reaches the handler, including the top row.
    ui.set_mode(Mode::Wire).unwrap();
    let actions = drag(&mut ui, &[(0, 0), (1, 0)]);
    assert_eq!(actions.len(), 1);
    assert_eq!(ui.wires().segments(), vec![Segment::new(0, 0, false)]);
}

#[test]
fn new_reports_surface_failure() {
    let mut surface = MemorySurface::new();
    surface.fail_creates_after(10);
    let err = Ui::new(&GridConfig::default(), surface).err().unwrap();
    assert!(matches!(err, CanvasError::Surface(_)));
}

// =============================================================
// Mode switching
// =============================================================

#[test]
fn set_mode_reports_and_restyles() {
    let mut ui = ui();
    let actions = ui.set_mode(Mode::Wire).unwrap();
    assert_eq!(actions, vec![Action::ModeChanged { mode: Mode::Wire }]);
    assert_eq!(ui.mode(), Mode::Wire);
    assert_eq!(control_fill(&ui, Mode::Wire), CONTROL_ACTIVE_COLOR);
    assert_eq!(control_fill(&ui, Mode::Module), CONTROL_COLOR);
}

#[test]
fn mode_change_is_reported_when_restyle_fails() {
    let mut ui = ui();
    ui.surface.fail_updates();
    let actions = ui.set_mode(Mode::Wire).unwrap();
    assert_eq!(actions, vec![Action::ModeChanged { mode: Mode::Wire }]);
    assert_eq!(ui.mode(), Mode::Wire);
    // Highlight is stale until the next successful restyle.
    assert_eq!(control_fill(&ui, Mode::Module), CONTROL_ACTIVE_COLOR);

    ui.surface.heal();
    ui.set_mode(Mode::Module).unwrap();
    assert_eq!(control_fill(&ui, Mode::Module), CONTROL_ACTIVE_COLOR);
    assert_eq!(control_fill(&ui, Mode::Wire), CONTROL_COLOR);
}

#[test]
fn set_same_mode_is_noop() {
    let mut ui = ui();
    let mutations = ui.surface().mutations();
    assert!(ui.set_mode(Mode::Module).unwrap().is_empty());
    assert_eq!(ui.surface().mutations(), mutations);
}

#[test]
fn clicking_control_activates_its_mode() {
    let mut ui = ui();
    let ev = control_event(&ui, Mode::Wire);
    let actions = click(&mut ui, ev);
    assert_eq!(actions, vec![Action::ModeChanged { mode: Mode::Wire }]);
    assert_eq!(ui.mode(), Mode::Wire);

    let ev = control_event(&ui, Mode::Module);
    click(&mut ui, ev);
    assert_eq!(ui.mode(), Mode::Module);
}

#[test]
fn control_gesture_is_not_forwarded() {
    let mut ui = ui();
    let ev = control_event(&ui, Mode::Module);
    ui.on_pointer_down(&ev).unwrap();
    let inside = over(&ui, 5, 5);
    assert!(ui.on_pointer_move(&inside).unwrap().is_empty());
    assert!(ui.modules().guide().is_none());
    ui.on_pointer_up(&inside).unwrap();

    // The next move reaches the handler again.
    ui.on_pointer_move(&inside).unwrap();
    assert!(ui.modules().guide().is_some());
}

#[test]
fn middle_click_cycles_mode() {
    let mut ui = ui();
    let ev = at(&ui, 3, 3).with_button(Button::Middle);
    assert_eq!(ui.on_pointer_down(&ev).unwrap(), vec![Action::ModeChanged { mode: Mode::Wire }]);
    ui.on_pointer_up(&ev).unwrap();
    ui.on_pointer_down(&ev).unwrap();
    assert_eq!(ui.mode(), Mode::Module);
    assert!(ui.modules().is_empty());
}

#[test]
fn cycle_mode_alternates() {
    let mut ui = ui();
    ui.cycle_mode().unwrap();
    assert_eq!(ui.mode(), Mode::Wire);
    ui.cycle_mode().unwrap();
    assert_eq!(ui.mode(), Mode::Module);
}

#[test]
fn secondary_button_is_ignored() {
    let mut ui = ui();
    let ev = over(&ui, 0, 0).with_button(Button::Secondary);
    assert!(ui.on_pointer_down(&ev).unwrap().is_empty());
    assert!(ui.modules().is_empty());
}

// =============================================================
// Dispatch
// =============================================================

#[test]
fn wire_mode_paints_on_drag() {
    let mut ui = ui_in(Mode::Wire);
    let actions = drag(&mut ui, &[(0, 0), (1, 0), (2, 0)]);
    assert_eq!(ui.wires().segments(), vec![Segment::new(0, 0, false), Segment::new(1, 0, false)]);
    assert_eq!(actions.len(), 2);
    assert_eq!(ui.surface().layer(Layer::Wires).len(), 2);
}

#[test]
fn wire_mode_does_not_place_or_guide() {
    let mut ui = ui_in(Mode::Wire);
    let ev = over(&ui, 5, 5);
    click(&mut ui, ev);
    ui.on_pointer_move(&ev).unwrap();
    assert!(ui.modules().is_empty());
    assert!(ui.modules().guide().is_none());
}

#[test]
fn module_mode_does_not_paint() {
    let mut ui = ui();
    drag(&mut ui, &[(10, 10), (11, 10), (12, 10)]);
    assert!(ui.wires().is_empty());
}

#[test]
fn module_mode_collision_scenario() {
    let mut ui = ui();
    let first = over(&ui, 0, 0);
    let actions = click(&mut ui, first);
    assert!(matches!(&actions[..], [Action::ModulePlaced { module }] if module.cell == Cell::new(0, 0)));

    let blocked = over(&ui, 2, 2);
    assert!(click(&mut ui, blocked).is_empty());

    let clear = over(&ui, 4, 0);
    click(&mut ui, clear);
    let cells: Vec<_> = ui.modules().modules().map(|m: &ModuleInstance| m.cell).collect();
    assert_eq!(cells, vec![Cell::new(0, 0), Cell::new(4, 0)]);
}

#[test]
fn module_mode_out_of_bounds_scenario() {
    let mut ui = ui();
    let ev = over(&ui, 46, 0);
    assert!(click(&mut ui, ev).is_empty());
    assert!(ui.modules().is_empty());
}

#[test]
fn pointer_leave_hides_guide() {
    let mut ui = ui();
    let ev = over(&ui, 5, 5);
    ui.on_pointer_move(&ev).unwrap();
    assert_eq!(ui.surface().layer(Layer::Guide).len(), 1);
    ui.on_pointer_leave().unwrap();
    assert!(ui.surface().layer(Layer::Guide).is_empty());
}

// =============================================================
// Mid-gesture mode switch
// =============================================================

#[test]
fn switching_mode_cancels_wire_drag() {
    let mut ui = ui_in(Mode::Wire);
    let down = at(&ui, 0, 0);
    ui.on_pointer_down(&down).unwrap();
    let step = at(&ui, 1, 0);
    ui.on_pointer_move(&step).unwrap();
    assert!(ui.wires().drag_state().is_active());

    ui.set_mode(Mode::Module).unwrap();
    assert!(!ui.wires().drag_state().is_active());

    ui.set_mode(Mode::Wire).unwrap();
    let next = at(&ui, 2, 0);
    assert!(ui.on_pointer_move(&next).unwrap().is_empty());
    assert_eq!(ui.wires().segments(), vec![Segment::new(0, 0, false)]);
}

#[test]
fn switching_mode_removes_guide() {
    let mut ui = ui();
    let ev = over(&ui, 5, 5);
    ui.on_pointer_move(&ev).unwrap();
    assert!(ui.modules().guide().is_some());
    ui.set_mode(Mode::Wire).unwrap();
    assert!(ui.modules().guide().is_none());
    assert!(ui.surface().layer(Layer::Guide).is_empty());
}

#[test]
fn switching_mid_gesture_redirects_remaining_events() {
    let mut ui = ui_in(Mode::Wire);
    let down = at(&ui, 0, 0);
    ui.on_pointer_down(&down).unwrap();
    ui.set_mode(Mode::Module).unwrap();
    let ev = over(&ui, 5, 5);
    ui.on_pointer_move(&ev).unwrap();
    ui.on_pointer_up(&ev).unwrap();
    assert!(ui.wires().is_empty());
    assert!(ui.modules().guide().is_some());
}

// =============================================================
// Actions
// =============================================================

#[test]
fn actions_serialize_with_type_tag() {
    let wire = Action::WireChanged { segment: Segment::new(1, 2, true), present: true };
    assert_eq!(
        serde_json::to_value(&wire).unwrap(),
        serde_json::json!({
            "type": "wire_changed",
            "segment": { "cell": { "x": 1, "y": 2 }, "vertical": true },
            "present": true,
        })
    );

    let mode = Action::ModeChanged { mode: Mode::Module };
    assert_eq!(serde_json::to_value(&mode).unwrap(), serde_json::json!({ "type": "mode_changed", "mode": "module" }));
}
