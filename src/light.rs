//! The draggable light bulb and the static lighting rig around it.
//!
//! [`LightController`] is a small hovered × dragging machine. A press on the
//! bulb claims the pointer; moves cast a pick ray onto the floor plane and
//! slide the bulb across it at its own height; the release toggles the bulb
//! only when the pointer never left the spot it was pressed at.

#[cfg(test)]
#[path = "light_test.rs"]
mod light_test;

use glam::DVec3;
use serde::Serialize;

use crate::consts::{
    DIMMED_FILL_INTENSITY, DIMMED_KEY_INTENSITY, DIMMED_RIM_INTENSITY, LIGHT_DEFAULT_POSITION, LIGHT_HIT_CENTER_Y,
    LIGHT_HIT_RADIUS, LIGHT_PLANE_Y,
};
use crate::error::ViewerError;
use crate::geometry::{Plane, Ray, Sphere};
use crate::input::PointerId;

/// Position and switch state of the bulb, reported to the host on change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightState {
    pub position: DVec3,
    pub is_on: bool,
}

impl LightState {
    /// JSON handed to the host's `onLightChanged` callback.
    ///
    /// # Errors
    ///
    /// [`ViewerError::Serialize`] when encoding fails.
    pub fn to_json(&self) -> Result<String, ViewerError> {
        serde_json::to_string(self).map_err(|source| ViewerError::Serialize { what: "light state", source })
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self { position: DVec3::from_array(LIGHT_DEFAULT_POSITION), is_on: true }
    }
}

/// What a pointer event did to the bulb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightEvent {
    Moved(DVec3),
    Toggled(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightController {
    state: LightState,
    hovered: bool,
    dragging: bool,
    was_dragging: bool,
    pointer: Option<PointerId>,
    /// Pick ray of the press; any move along a different ray is a drag.
    press: Option<Ray>,
    plane: Plane,
}

impl Default for LightController {
    fn default() -> Self {
        Self::new(LightState::default())
    }
}

impl LightController {
    #[must_use]
    pub fn new(state: LightState) -> Self {
        Self {
            state,
            hovered: false,
            dragging: false,
            was_dragging: false,
            pointer: None,
            press: None,
            plane: Plane::horizontal(LIGHT_PLANE_Y),
        }
    }

    #[must_use]
    pub fn state(&self) -> LightState {
        self.state
    }

    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether `id` is the pointer currently pressing the bulb.
    #[must_use]
    pub fn owns_pointer(&self, id: PointerId) -> bool {
        self.pointer == Some(id)
    }

    /// Whether `ray` hits the bulb's pick sphere.
    #[must_use]
    pub fn hit(&self, ray: &Ray) -> bool {
        let center = self.state.position + DVec3::new(0.0, LIGHT_HIT_CENTER_Y, 0.0);
        Sphere::new(center, LIGHT_HIT_RADIUS).intersects(ray)
    }

    /// Update the hover flag. Returns true when it changed.
    pub fn hover(&mut self, ray: &Ray) -> bool {
        let hovered = self.hit(ray);
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }

    /// Press. Returns true when the bulb claimed the pointer.
    pub fn pointer_down(&mut self, id: PointerId, ray: &Ray) -> bool {
        if self.pointer.is_some() || !self.hit(ray) {
            return false;
        }
        self.pointer = Some(id);
        self.press = Some(*ray);
        self.dragging = true;
        self.was_dragging = false;
        true
    }

    /// Slide the bulb to where `ray` meets the floor plane, keeping its height.
    pub fn pointer_move(&mut self, id: PointerId, ray: &Ray) -> Option<LightEvent> {
        if !self.dragging || !self.owns_pointer(id) {
            return None;
        }
        if self.press.as_ref() != Some(ray) {
            self.was_dragging = true;
        }
        let hit = self.plane.intersect(ray)?;
        let next = DVec3::new(hit.x, self.state.position.y, hit.z);
        if next == self.state.position {
            return None;
        }
        self.state.position = next;
        Some(LightEvent::Moved(next))
    }

    /// Release. A press whose pointer never moved is a click and toggles it.
    pub fn pointer_up(&mut self, id: PointerId) -> Option<LightEvent> {
        if !self.owns_pointer(id) {
            return None;
        }
        self.pointer = None;
        self.press = None;
        self.dragging = false;
        if self.was_dragging {
            return None;
        }
        self.state.is_on = !self.state.is_on;
        log::debug!("light bulb switched {}", if self.state.is_on { "on" } else { "off" });
        Some(LightEvent::Toggled(self.state.is_on))
    }

    /// Abort a press without toggling.
    pub fn pointer_cancel(&mut self, id: PointerId) {
        if self.owns_pointer(id) {
            self.pointer = None;
            self.press = None;
            self.dragging = false;
        }
    }

    /// Helper text shown above the bulb.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match (self.dragging, self.hovered, self.state.is_on) {
            (true, _, _) => "Drag to move",
            (false, true, true) => "Click to turn off",
            (false, true, false) => "Click to turn on",
            (false, false, _) => "",
        }
    }
}

/// Intensities of the scene's fixed lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingRig {
    pub ambient: f64,
    pub key: f64,
    pub fill: f64,
    pub rim: f64,
    /// Whether the key/fill/rim directional lights exist at all.
    pub directional: bool,
}

impl LightingRig {
    /// Rig as rendered for the bulb's switch state: off dims key/fill/rim.
    #[must_use]
    pub fn effective(&self, bulb_on: bool) -> Self {
        if bulb_on {
            return *self;
        }
        Self { key: DIMMED_KEY_INTENSITY, fill: DIMMED_FILL_INTENSITY, rim: DIMMED_RIM_INTENSITY, ..*self }
    }
}
