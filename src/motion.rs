//! Per-frame motion blending.
//!
//! [`MotionBlender::tick`] runs once per rendered frame and folds every
//! continuous motion source into one [`ObjectTransform`]:
//!
//! | Source | Feeds | Kind |
//! |--------|-------|------|
//! | parallax | position | eased target, NDC offset |
//! | hover | orientation | eased target, applied as a per-frame delta |
//! | autorotate | yaw | constant speed × `dt` |
//! | drag inertia | yaw, pitch | velocity, damped each frame |
//!
//! Targets say where a source wants to be; the eased `current` values are
//! what actually reaches the transform. Hover only ever contributes the
//! change since the previous frame, so it layers on top of drag rotation
//! instead of overwriting it.

#[cfg(test)]
#[path = "motion_test.rs"]
mod motion_test;

use glam::{DMat4, DVec2, DVec3};

use crate::asset::Normalization;
use crate::camera::PerspectiveCamera;
use crate::consts::{
    HOVER_EASE, HOVER_MAG, INERTIA_DAMPING, PARALLAX_EASE, PARALLAX_MAG, SETTLE_EPSILON, VELOCITY_EPSILON,
};

/// A 2D value smoothed toward a target by a fixed fraction per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eased {
    pub current: DVec2,
    pub target: DVec2,
    /// Fraction of the remaining distance covered per step, in `(0, 1)`.
    pub ease: f64,
}

impl Eased {
    #[must_use]
    pub fn new(ease: f64) -> Self {
        Self { current: DVec2::ZERO, target: DVec2::ZERO, ease }
    }

    /// Advance one frame. Returns how far `current` moved.
    pub fn step(&mut self) -> DVec2 {
        let delta = (self.target - self.current) * self.ease;
        self.current += delta;
        delta
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        let gap = (self.target - self.current).abs();
        gap.x <= SETTLE_EPSILON && gap.y <= SETTLE_EPSILON
    }
}

/// Accumulated object rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Rotation about the vertical axis.
    pub yaw: f64,
    /// Rotation about the horizontal screen axis.
    pub pitch: f64,
}

impl Orientation {
    #[must_use]
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    /// From `(yaw, pitch)` in degrees.
    #[must_use]
    pub fn from_degrees(yaw: f64, pitch: f64) -> Self {
        Self { yaw: yaw.to_radians(), pitch: pitch.to_radians() }
    }
}

/// Final placement of the object for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    /// World position of the outer group.
    pub position: DVec3,
    pub orientation: Orientation,
    /// Inner-group normalization applied before rotation.
    pub normalization: Normalization,
}

impl ObjectTransform {
    /// `translate × rotate_x(pitch) × rotate_y(yaw) × normalize`.
    #[must_use]
    pub fn model_matrix(&self) -> DMat4 {
        DMat4::from_translation(self.position)
            * DMat4::from_rotation_x(self.orientation.pitch)
            * DMat4::from_rotation_y(self.orientation.yaw)
            * self.normalization.matrix()
    }
}

/// Blends drag, inertia, parallax, hover and autorotation each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionBlender {
    pub orientation: Orientation,
    /// World position written by the last tick.
    pub position: DVec3,
    /// Rotation per frame as `(yaw, pitch)`; seeded by drags, decays on its own.
    pub velocity: DVec2,
    /// Screen-space nudge in NDC.
    pub parallax: Eased,
    /// Tilt as `(pitch, yaw)` radians.
    pub hover: Eased,
    pivot: DVec3,
    offset_ndc: DVec2,
    auto_rotate: Option<f64>,
}

impl MotionBlender {
    /// `offset_ndc` is the fixed screen anchor offset; `auto_rotate` is the
    /// yaw speed in radians per second when enabled.
    #[must_use]
    pub fn new(orientation: Orientation, offset_ndc: DVec2, auto_rotate: Option<f64>) -> Self {
        Self {
            orientation,
            position: DVec3::ZERO,
            velocity: DVec2::ZERO,
            parallax: Eased::new(PARALLAX_EASE),
            hover: Eased::new(HOVER_EASE),
            pivot: DVec3::ZERO,
            offset_ndc,
            auto_rotate,
        }
    }

    /// Restore the initial orientation and stop any inertia.
    pub fn reset_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.velocity = DVec2::ZERO;
    }

    /// World point kept glued to the screen anchor.
    pub fn set_pivot(&mut self, pivot: DVec3) {
        self.pivot = pivot;
        self.position = pivot;
    }

    #[must_use]
    pub fn pivot(&self) -> DVec3 {
        self.pivot
    }

    pub fn set_offset_ndc(&mut self, offset_ndc: DVec2) {
        self.offset_ndc = offset_ndc;
    }

    /// Drop any pending inertia.
    pub fn stop_inertia(&mut self) {
        self.velocity = DVec2::ZERO;
    }

    /// Apply one drag step and record it as the latest velocity sample.
    pub fn apply_drag(&mut self, delta: DVec2) {
        self.orientation.yaw += delta.x;
        self.orientation.pitch += delta.y;
        self.velocity = delta;
    }

    /// Retarget parallax and hover from a pointer position normalized to
    /// `[-1, 1]` (`+y` down).
    pub fn set_pointer_targets(&mut self, normalized: DVec2, parallax: bool, hover: bool) {
        if parallax {
            self.parallax.target = -normalized * PARALLAX_MAG;
        }
        if hover {
            self.hover.target = DVec2::new(normalized.y * HOVER_MAG, normalized.x * HOVER_MAG);
        }
    }

    /// Advance one frame. `holding` is true while a gesture owns a pointer.
    /// Returns whether another frame is needed.
    pub fn tick(&mut self, dt: f64, camera: &PerspectiveCamera, holding: bool) -> bool {
        self.parallax.step();
        let hover_delta = self.hover.step();

        let mut ndc = camera.project(self.pivot);
        ndc.x += self.offset_ndc.x + self.parallax.current.x;
        ndc.y += self.offset_ndc.y + self.parallax.current.y;
        let anchored = camera.unproject(ndc);
        if anchored.is_finite() {
            self.position = anchored;
        }

        self.orientation.pitch += hover_delta.x;
        self.orientation.yaw += hover_delta.y;

        if let Some(speed) = self.auto_rotate {
            self.orientation.yaw += speed * dt;
        }

        if !holding {
            self.orientation.yaw += self.velocity.x;
            self.orientation.pitch += self.velocity.y;
        }
        self.velocity *= INERTIA_DAMPING;
        if self.velocity.x.abs() <= VELOCITY_EPSILON && self.velocity.y.abs() <= VELOCITY_EPSILON {
            self.velocity = DVec2::ZERO;
        }

        self.velocity != DVec2::ZERO
            || self.auto_rotate.is_some()
            || !self.parallax.is_settled()
            || !self.hover.is_settled()
    }

    #[must_use]
    pub fn transform(&self, normalization: Normalization) -> ObjectTransform {
        ObjectTransform { position: self.position, orientation: self.orientation, normalization }
    }
}
