#![allow(clippy::float_cmp)]

use super::*;
use patch_canvas::grid::Point;

#[test]
fn map_button_follows_dom_numbering() {
    assert_eq!(map_button(0), Button::Primary);
    assert_eq!(map_button(1), Button::Middle);
    assert_eq!(map_button(2), Button::Secondary);
}

#[test]
fn map_button_treats_extra_buttons_as_primary() {
    assert_eq!(map_button(3), Button::Primary);
    assert_eq!(map_button(-1), Button::Primary);
}

#[test]
fn surface_event_subtracts_surface_corner() {
    let ev = surface_event(130, 90, 100.0, 40.5, 0);
    assert_eq!(ev.offset, Point::new(30.0, 49.5));
    assert_eq!(ev.button, Button::Primary);
}

#[test]
fn surface_event_carries_button() {
    assert_eq!(surface_event(0, 0, 0.0, 0.0, 1).button, Button::Middle);
}

#[test]
fn dom_names_are_distinct() {
    let names: Vec<_> = PointerKind::ALL.iter().map(|k| k.dom_name()).collect();
    assert_eq!(names, vec!["pointerdown", "pointermove", "pointerup", "pointercancel", "pointerleave"]);
}
