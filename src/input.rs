//! Input model: normalized pointer events, device classes and capabilities.
//!
//! The browser reports mouse, pen and touch contacts through one pointer
//! event stream. This module reduces that stream to the small vocabulary the
//! rest of the crate consumes: a [`PointerEvent`] carrying a phase, an id, a
//! viewport-relative position and the [`DeviceClass`] that decides which
//! gesture policy applies. Mouse and pen share the continuous drag and hover
//! path; touch goes through the multi-pointer classifier and never drives
//! hover or parallax.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

/// Browser pointer identifier.
pub type PointerId = i32;

/// A point in viewport space (CSS pixels, origin at the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Which kind of device produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// A mouse or trackpad.
    Mouse,
    /// A stylus; treated like a mouse.
    Pen,
    /// A finger on a touch surface.
    Touch,
}

impl DeviceClass {
    /// Map the DOM `pointerType` string. Unknown types yield `None`.
    #[must_use]
    pub fn from_pointer_type(raw: &str) -> Option<Self> {
        match raw {
            "mouse" => Some(Self::Mouse),
            "pen" => Some(Self::Pen),
            "touch" => Some(Self::Touch),
            _ => None,
        }
    }

    /// Whether this device goes through the multi-touch gesture path.
    #[must_use]
    pub fn is_touch(self) -> bool {
        matches!(self, Self::Touch)
    }
}

/// Lifecycle phase of a pointer contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The browser took the pointer away (scroll, palm rejection, lost capture).
    Cancel,
}

/// A normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub id: PointerId,
    /// Position relative to the viewport's top-left corner.
    pub position: Point,
    pub device: DeviceClass,
}

impl PointerEvent {
    #[must_use]
    pub fn new(phase: PointerPhase, id: PointerId, position: Point, device: DeviceClass) -> Self {
        Self { phase, id, position, device }
    }

    /// Build an event from raw DOM fields.
    ///
    /// `client` is the page-space position and `origin` the viewport's
    /// top-left corner in the same space. Returns `None` for pointer types the
    /// viewer does not handle.
    #[must_use]
    pub fn from_raw(phase: PointerPhase, id: PointerId, client: Point, origin: Point, pointer_type: &str) -> Option<Self> {
        let device = DeviceClass::from_pointer_type(pointer_type)?;
        let position = Point::new(client.x - origin.x, client.y - origin.y);
        Some(Self { phase, id, position, device })
    }

    /// Whether this event ends the contact (up or cancel).
    #[must_use]
    pub fn ends_contact(&self) -> bool {
        matches!(self.phase, PointerPhase::Up | PointerPhase::Cancel)
    }
}

/// What the current device can do, detected once per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// The device exposes a touch surface.
    ///
    /// Touch-capable devices use the touch gesture path exclusively; mouse
    /// drag, hover tilt and parallax stay inactive on them.
    pub touch: bool,
}

impl Capabilities {
    /// Whether events from `device` are routed into gesture handling.
    #[must_use]
    pub fn accepts(self, device: DeviceClass) -> bool {
        device.is_touch() == self.touch
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}
