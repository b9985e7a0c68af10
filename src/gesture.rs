//! Gesture classification: the idle/deciding/rotate/pinch state machine.
//!
//! The classifier owns every active [`PointerState`], keyed by pointer id, and
//! reduces each pointer event to zero or more [`Gesture`]s for the session to
//! apply. Exactly one [`GestureState`] is active at a time; each variant
//! carries the context needed to compute the next delta.
//!
//! Touch contacts start in `Deciding` and only become a rotation once they
//! travel past [`DECIDE_PX`] on either axis. A second finger switches to
//! pinch-zoom whenever zoom is enabled, and dropping back to one finger ends
//! the pinch without resuming the rotation. Mouse and pen skip the deciding
//! phase entirely: a press starts a rotation immediately.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use std::collections::HashMap;

use glam::DVec2;

use crate::camera::ZoomLimits;
use crate::consts::{DECIDE_PX, ROTATE_SPEED};
use crate::input::{DeviceClass, Point, PointerEvent, PointerId, PointerPhase};

/// The exclusive interpretation applied to the active pointer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    #[default]
    Idle,
    Deciding,
    Rotate,
    Pinch,
}

/// A tracked pointer contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub id: PointerId,
    pub position: Point,
    pub device: DeviceClass,
}

/// Active gesture with the context needed to compute deltas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A single touch is down but has not travelled far enough to commit.
    Deciding {
        /// The touch being watched.
        id: PointerId,
        /// Where the touch went down.
        start: Point,
    },
    /// A single pointer is rotating the object.
    Rotating {
        /// The pointer driving the rotation.
        id: PointerId,
        /// Position at the previous event, used to compute the delta.
        last: Point,
    },
    /// Two touches are zooming the camera.
    Pinching {
        /// First touch of the pair.
        a: PointerId,
        /// Second touch of the pair.
        b: PointerId,
        /// Distance between the touches when the pinch began.
        start_distance: f64,
        /// Camera distance when the pinch began.
        baseline: f64,
    },
}

impl GestureState {
    #[must_use]
    pub fn mode(&self) -> GestureMode {
        match self {
            Self::Idle => GestureMode::Idle,
            Self::Deciding { .. } => GestureMode::Deciding,
            Self::Rotating { .. } => GestureMode::Rotate,
            Self::Pinching { .. } => GestureMode::Pinch,
        }
    }
}

/// Which gestures the host enabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GesturePolicy {
    pub rotate: bool,
    pub zoom: bool,
    pub limits: ZoomLimits,
}

/// Output of the classifier for one pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Rotate by `(yaw, pitch)` radians; also the latest velocity sample.
    Rotate(DVec2),
    /// Set the camera distance (already clamped).
    Zoom(f64),
    /// Route all further events of this pointer to the viewer.
    CapturePointer(PointerId),
    /// Suppress the browser's default scroll/zoom handling for this event.
    PreventDefault,
}

/// Gesture state machine over the active pointer set.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    pointers: HashMap<PointerId, PointerState>,
    state: GestureState,
}

impl GestureClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> GestureMode {
        self.state.mode()
    }

    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Whether any pointer is being tracked.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.pointers.is_empty()
    }

    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    #[must_use]
    pub fn pointer(&self, id: PointerId) -> Option<&PointerState> {
        self.pointers.get(&id)
    }

    /// Forget every pointer and return to idle.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.transition(GestureState::Idle);
    }

    /// Feed one pointer event. `camera_distance` is the current distance,
    /// used as the pinch baseline.
    pub fn handle(&mut self, event: &PointerEvent, policy: &GesturePolicy, camera_distance: f64) -> Vec<Gesture> {
        match event.phase {
            PointerPhase::Down => self.on_down(event, policy, camera_distance),
            PointerPhase::Move => self.on_move(event, policy),
            PointerPhase::Up | PointerPhase::Cancel => {
                self.on_up(event.id);
                Vec::new()
            }
        }
    }

    fn on_down(&mut self, event: &PointerEvent, policy: &GesturePolicy, camera_distance: f64) -> Vec<Gesture> {
        if !event.device.is_touch() {
            if !policy.rotate || self.is_active() {
                return Vec::new();
            }
            self.track(event);
            self.transition(GestureState::Rotating { id: event.id, last: event.position });
            return Vec::new();
        }

        self.track(event);
        match self.pointers.len() {
            1 => {
                self.transition(GestureState::Deciding { id: event.id, start: event.position });
                Vec::new()
            }
            2 if policy.zoom => {
                let mut ids = self.pointers.keys().copied().collect::<Vec<_>>();
                ids.sort_unstable();
                let (a, b) = (ids[0], ids[1]);
                let start_distance = self.gap(a, b).unwrap_or(0.0);
                self.transition(GestureState::Pinching { a, b, start_distance, baseline: camera_distance });
                vec![Gesture::PreventDefault]
            }
            _ => Vec::new(),
        }
    }

    fn on_move(&mut self, event: &PointerEvent, policy: &GesturePolicy) -> Vec<Gesture> {
        let Some(tracked) = self.pointers.get_mut(&event.id) else {
            return Vec::new();
        };
        tracked.position = event.position;

        let mut out = Vec::new();
        if let GestureState::Deciding { id, start } = self.state
            && id == event.id
        {
            let dx = event.position.x - start.x;
            let dy = event.position.y - start.y;
            if dx.abs() > DECIDE_PX || dy.abs() > DECIDE_PX {
                if policy.rotate {
                    self.transition(GestureState::Rotating { id, last: start });
                    out.push(Gesture::CapturePointer(id));
                } else {
                    // Abandoned: the contact never becomes a drag.
                    self.pointers.clear();
                    self.transition(GestureState::Idle);
                    return out;
                }
            }
        }

        match self.state {
            GestureState::Rotating { id, last } if id == event.id => {
                let delta = DVec2::new(event.position.x - last.x, event.position.y - last.y) * ROTATE_SPEED;
                self.state = GestureState::Rotating { id, last: event.position };
                if event.device.is_touch() {
                    out.push(Gesture::PreventDefault);
                }
                out.push(Gesture::Rotate(delta));
            }
            GestureState::Pinching { a, b, start_distance, baseline } => {
                if let Some(current) = self.gap(a, b) {
                    out.push(Gesture::PreventDefault);
                    if start_distance <= f64::EPSILON {
                        // Both touches began on the same spot; measure from here.
                        self.state = GestureState::Pinching { a, b, start_distance: current, baseline };
                    } else if current > f64::EPSILON {
                        out.push(Gesture::Zoom(policy.limits.clamp(baseline * start_distance / current)));
                    }
                }
            }
            _ => {}
        }
        out
    }

    fn on_up(&mut self, id: PointerId) {
        if self.pointers.remove(&id).is_none() {
            return;
        }
        let next = match self.state {
            _ if self.pointers.is_empty() => GestureState::Idle,
            GestureState::Pinching { a, b, .. } if a == id || b == id => GestureState::Idle,
            GestureState::Rotating { id: owner, .. } | GestureState::Deciding { id: owner, .. } if owner == id => {
                GestureState::Idle
            }
            other => other,
        };
        self.transition(next);
    }

    fn track(&mut self, event: &PointerEvent) {
        self.pointers.insert(event.id, PointerState { id: event.id, position: event.position, device: event.device });
    }

    fn gap(&self, a: PointerId, b: PointerId) -> Option<f64> {
        let pa = self.pointers.get(&a)?;
        let pb = self.pointers.get(&b)?;
        Some(pa.position.distance(pb.position))
    }

    fn transition(&mut self, next: GestureState) {
        if next.mode() != self.state.mode() {
            log::debug!("gesture {:?} -> {:?}", self.state.mode(), next.mode());
        }
        self.state = next;
    }
}
