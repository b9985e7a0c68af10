#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Point
// =============================================================

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_distance_is_euclidean() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert_eq!(a.distance(b), 5.0);
    assert_eq!(b.distance(a), 5.0);
}

// =============================================================
// DeviceClass
// =============================================================

#[test]
fn device_class_from_dom_pointer_types() {
    assert_eq!(DeviceClass::from_pointer_type("mouse"), Some(DeviceClass::Mouse));
    assert_eq!(DeviceClass::from_pointer_type("pen"), Some(DeviceClass::Pen));
    assert_eq!(DeviceClass::from_pointer_type("touch"), Some(DeviceClass::Touch));
}

#[test]
fn device_class_unknown_pointer_type_is_none() {
    assert_eq!(DeviceClass::from_pointer_type(""), None);
    assert_eq!(DeviceClass::from_pointer_type("Touch"), None);
    assert_eq!(DeviceClass::from_pointer_type("gamepad"), None);
}

#[test]
fn only_touch_is_touch() {
    assert!(DeviceClass::Touch.is_touch());
    assert!(!DeviceClass::Mouse.is_touch());
    assert!(!DeviceClass::Pen.is_touch());
}

// =============================================================
// PointerEvent
// =============================================================

#[test]
fn from_raw_subtracts_viewport_origin() {
    let ev = PointerEvent::from_raw(
        PointerPhase::Down,
        7,
        Point::new(150.0, 90.0),
        Point::new(100.0, 40.0),
        "touch",
    );
    let ev = ev.unwrap();
    assert_eq!(ev.id, 7);
    assert_eq!(ev.position, Point::new(50.0, 50.0));
    assert_eq!(ev.device, DeviceClass::Touch);
    assert_eq!(ev.phase, PointerPhase::Down);
}

#[test]
fn from_raw_rejects_unknown_device() {
    let ev = PointerEvent::from_raw(PointerPhase::Move, 1, Point::new(0.0, 0.0), Point::new(0.0, 0.0), "laser");
    assert!(ev.is_none());
}

#[test]
fn up_and_cancel_end_contact() {
    let at = Point::new(0.0, 0.0);
    assert!(PointerEvent::new(PointerPhase::Up, 1, at, DeviceClass::Mouse).ends_contact());
    assert!(PointerEvent::new(PointerPhase::Cancel, 1, at, DeviceClass::Touch).ends_contact());
    assert!(!PointerEvent::new(PointerPhase::Down, 1, at, DeviceClass::Mouse).ends_contact());
    assert!(!PointerEvent::new(PointerPhase::Move, 1, at, DeviceClass::Pen).ends_contact());
}

// =============================================================
// Capabilities
// =============================================================

#[test]
fn non_touch_device_accepts_mouse_and_pen_only() {
    let caps = Capabilities { touch: false };
    assert!(caps.accepts(DeviceClass::Mouse));
    assert!(caps.accepts(DeviceClass::Pen));
    assert!(!caps.accepts(DeviceClass::Touch));
}

#[test]
fn touch_device_accepts_touch_only() {
    let caps = Capabilities { touch: true };
    assert!(caps.accepts(DeviceClass::Touch));
    assert!(!caps.accepts(DeviceClass::Mouse));
    assert!(!caps.accepts(DeviceClass::Pen));
}

#[test]
fn capabilities_default_is_non_touch() {
    assert!(!Capabilities::default().touch);
}
