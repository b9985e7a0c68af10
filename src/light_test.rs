#![allow(clippy::float_cmp)]

use super::*;

/// Ray from above, straight down onto `(x, ·, z)`.
fn down_at(x: f64, z: f64) -> Ray {
    Ray::new(DVec3::new(x, 10.0, z), DVec3::NEG_Y)
}

/// Ray looking at the default bulb position from the camera side.
fn at_bulb() -> Ray {
    let target = DVec3::from_array(LIGHT_DEFAULT_POSITION) + DVec3::new(0.0, LIGHT_HIT_CENTER_Y, 0.0);
    let origin = DVec3::new(0.0, 0.0, 10.0);
    Ray::new(origin, target - origin)
}

fn missing() -> Ray {
    Ray::new(DVec3::new(0.0, 0.0, 10.0), DVec3::NEG_Z)
}

// =============================================================
// Defaults / hit testing
// =============================================================

#[test]
fn default_bulb_is_on_at_default_position() {
    let c = LightController::default();
    assert_eq!(c.state(), LightState { position: DVec3::new(3.0, 2.0, 3.0), is_on: true });
    assert!(!c.is_hovered());
    assert!(!c.is_dragging());
    assert_eq!(c.label(), "");
}

#[test]
fn hit_detects_bulb() {
    let c = LightController::default();
    assert!(c.hit(&at_bulb()));
    assert!(!c.hit(&missing()));
}

#[test]
fn hover_reports_changes_only() {
    let mut c = LightController::default();
    assert!(c.hover(&at_bulb()));
    assert!(!c.hover(&at_bulb()));
    assert_eq!(c.label(), "Click to turn off");
    assert!(c.hover(&missing()));
    assert!(!c.is_hovered());
}

// =============================================================
// Click vs drag
// =============================================================

#[test]
fn click_without_movement_toggles() {
    let mut c = LightController::default();
    assert!(c.pointer_down(1, &at_bulb()));
    assert_eq!(c.pointer_up(1), Some(LightEvent::Toggled(false)));
    assert!(!c.state().is_on);
    assert_eq!(c.state().position, DVec3::new(3.0, 2.0, 3.0));

    assert!(c.pointer_down(2, &at_bulb()));
    assert_eq!(c.pointer_up(2), Some(LightEvent::Toggled(true)));
    assert!(c.state().is_on);
}

#[test]
fn drag_repositions_without_toggling() {
    let mut c = LightController::default();
    assert!(c.pointer_down(1, &at_bulb()));
    let moved = c.pointer_move(1, &down_at(-1.0, 0.5));
    assert_eq!(moved, Some(LightEvent::Moved(DVec3::new(-1.0, 2.0, 0.5))));
    assert_eq!(c.pointer_up(1), None);
    assert!(c.state().is_on);
    assert_eq!(c.state().position, DVec3::new(-1.0, 2.0, 0.5));
}

#[test]
fn move_without_leaving_press_point_is_still_a_click() {
    let mut c = LightController::default();
    assert!(c.pointer_down(1, &at_bulb()));
    c.pointer_move(1, &at_bulb());
    assert_eq!(c.pointer_up(1), Some(LightEvent::Toggled(false)));
}

#[test]
fn moved_pointer_that_misses_floor_does_not_toggle() {
    let mut c = LightController::default();
    assert!(c.pointer_down(1, &at_bulb()));
    let origin = DVec3::new(0.0, 1.0, 10.0);
    assert_eq!(c.pointer_move(1, &Ray::new(origin, DVec3::new(0.1, 0.5, -1.0))), None);
    assert_eq!(c.pointer_move(1, &Ray::new(origin, DVec3::new(0.2, 0.6, -1.0))), None);
    assert_eq!(c.pointer_up(1), None);
    assert!(c.state().is_on);
    assert_eq!(c.state().position, DVec3::new(3.0, 2.0, 3.0));
}

#[test]
fn drag_back_to_start_does_not_toggle() {
    let mut c = LightController::default();
    assert!(c.pointer_down(1, &at_bulb()));
    c.pointer_move(1, &down_at(0.0, 0.0));
    c.pointer_move(1, &down_at(3.0, 3.0));
    assert_eq!(c.pointer_up(1), None);
    assert!(c.state().is_on);
}

#[test]
fn next_press_after_drag_can_click() {
    let mut c = LightController::default();
    c.pointer_down(1, &at_bulb());
    c.pointer_move(1, &down_at(3.0, 3.5));
    assert_eq!(c.pointer_up(1), None);
    let ray = Ray::new(DVec3::new(3.0, 10.0, 3.5), DVec3::NEG_Y);
    assert!(c.pointer_down(2, &ray));
    assert_eq!(c.pointer_up(2), Some(LightEvent::Toggled(false)));
}

#[test]
fn drag_keeps_height_fixed() {
    let mut c = LightController::default();
    c.pointer_down(1, &at_bulb());
    let slanted = Ray::new(DVec3::new(0.0, 5.0, 5.0), DVec3::new(1.0, -1.0, -1.0));
    c.pointer_move(1, &slanted);
    let p = c.state().position;
    assert_eq!(p.y, 2.0);
    assert!((p.x - 5.0).abs() < 1e-12);
    assert!(p.z.abs() < 1e-12);
}

#[test]
fn ray_missing_floor_leaves_bulb() {
    let mut c = LightController::default();
    c.pointer_down(1, &at_bulb());
    let upward = Ray::new(DVec3::new(0.0, 1.0, 0.0), DVec3::Y);
    assert_eq!(c.pointer_move(1, &upward), None);
    assert_eq!(c.state().position, DVec3::new(3.0, 2.0, 3.0));
}

#[test]
fn drag_label_and_flags() {
    let mut c = LightController::default();
    c.pointer_down(4, &at_bulb());
    assert!(c.is_dragging());
    assert!(c.owns_pointer(4));
    assert!(!c.owns_pointer(5));
    assert_eq!(c.label(), "Drag to move");
}

#[test]
fn press_off_bulb_is_not_claimed() {
    let mut c = LightController::default();
    assert!(!c.pointer_down(1, &missing()));
    assert!(!c.is_dragging());
    assert_eq!(c.pointer_up(1), None);
}

#[test]
fn foreign_pointers_are_ignored() {
    let mut c = LightController::default();
    c.pointer_down(1, &at_bulb());
    assert!(!c.pointer_down(2, &at_bulb()));
    assert_eq!(c.pointer_move(2, &down_at(0.0, 0.0)), None);
    assert_eq!(c.pointer_up(2), None);
    assert!(c.is_dragging());
}

#[test]
fn cancel_ends_press_without_toggle() {
    let mut c = LightController::default();
    c.pointer_down(1, &at_bulb());
    c.pointer_cancel(1);
    assert!(!c.is_dragging());
    assert!(c.state().is_on);
    assert_eq!(c.pointer_up(1), None);
}

#[test]
fn label_when_off_and_hovered() {
    let mut c = LightController::new(LightState { position: DVec3::new(3.0, 2.0, 3.0), is_on: false });
    c.hover(&at_bulb());
    assert_eq!(c.label(), "Click to turn on");
}

// =============================================================
// LightingRig
// =============================================================

#[test]
fn rig_dims_when_bulb_off() {
    let rig = LightingRig { ambient: 0.3, key: 1.0, fill: 0.5, rim: 0.8, directional: true };
    assert_eq!(rig.effective(true), rig);
    let off = rig.effective(false);
    assert_eq!(off.ambient, 0.3);
    assert_eq!((off.key, off.fill, off.rim), (0.2, 0.1, 0.1));
}

#[test]
fn light_state_json_is_camel_case() {
    let json = LightState::default().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["isOn"], true);
    assert_eq!(value["position"], serde_json::json!([3.0, 2.0, 3.0]));
}
