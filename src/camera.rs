#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use glam::{DMat4, DVec2, DVec3};

use crate::consts::{CLIP_RATIO, DEFAULT_FAR, DEFAULT_FOV_DEG, DEFAULT_NEAR, FRAME_MARGIN};
use crate::geometry::{Ray, Sphere};
use crate::input::Point;

/// Size of the viewer surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width: width.max(1.0), height: height.max(1.0) }
    }

    #[must_use]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Map a viewport point to `[-1, 1]` on both axes with `+y` pointing down.
    ///
    /// Points outside the viewport are clamped to its edge.
    #[must_use]
    pub fn normalized(&self, p: Point) -> DVec2 {
        DVec2::new(p.x / self.width * 2.0 - 1.0, p.y / self.height * 2.0 - 1.0).clamp(DVec2::NEG_ONE, DVec2::ONE)
    }

    /// Map a viewport point to normalized device coordinates (`+y` up).
    #[must_use]
    pub fn to_ndc(&self, p: Point) -> DVec2 {
        DVec2::new(p.x / self.width * 2.0 - 1.0, 1.0 - p.y / self.height * 2.0)
    }

    /// Convert a pixel offset (`+y` down) to an NDC offset (`+y` up).
    #[must_use]
    pub fn offset_to_ndc(&self, dx: f64, dy: f64) -> DVec2 {
        DVec2::new(dx * 2.0 / self.width, -dy * 2.0 / self.height)
    }
}

/// Closed range of allowed camera-to-target distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl ZoomLimits {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min: min.min(max), max: min.max(max) }
    }

    #[must_use]
    pub fn clamp(&self, distance: f64) -> f64 {
        distance.max(self.min).min(self.max)
    }
}

/// Perspective camera orbiting a target point.
///
/// Uses OpenGL conventions: right-handed view space looking down `-Z`, NDC
/// depth in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub eye: DVec3,
    pub target: DVec3,
    pub up: DVec3,
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl PerspectiveCamera {
    /// Camera on the `+Z` axis at `distance`, looking at the origin.
    #[must_use]
    pub fn new(aspect: f64, distance: f64) -> Self {
        Self {
            eye: DVec3::new(0.0, 0.0, distance),
            target: DVec3::ZERO,
            up: DVec3::Y,
            fov_deg: DEFAULT_FOV_DEG,
            aspect,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }

    #[must_use]
    pub fn view(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye, self.target, self.up)
    }

    #[must_use]
    pub fn projection(&self) -> DMat4 {
        DMat4::perspective_rh_gl(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    #[must_use]
    pub fn view_projection(&self) -> DMat4 {
        self.projection() * self.view()
    }

    /// World point to normalized device coordinates.
    #[must_use]
    pub fn project(&self, world: DVec3) -> DVec3 {
        self.view_projection().project_point3(world)
    }

    /// Normalized device coordinates back to a world point.
    #[must_use]
    pub fn unproject(&self, ndc: DVec3) -> DVec3 {
        self.view_projection().inverse().project_point3(ndc)
    }

    /// Pick ray from the eye through an NDC position.
    #[must_use]
    pub fn ray_through(&self, ndc: DVec2) -> Ray {
        let through = self.unproject(ndc.extend(0.5));
        Ray::new(self.eye, through - self.eye)
    }

    #[must_use]
    pub fn distance(&self) -> f64 {
        self.eye.distance(self.target)
    }

    /// Move the eye along its current line of sight to `distance` from the
    /// target, clamped to `limits`. Returns the distance applied.
    pub fn set_distance(&mut self, distance: f64, limits: &ZoomLimits) -> f64 {
        let clamped = limits.clamp(distance);
        let dir = (self.eye - self.target).try_normalize().unwrap_or(DVec3::Z);
        self.eye = self.target + dir * clamped;
        clamped
    }

    /// Place the camera so `sphere` fits the vertical field of view.
    ///
    /// The eye moves onto the `+Z` side of the sphere center and the clip
    /// planes follow the new distance. Returns `None` without touching the
    /// camera when the sphere is degenerate.
    pub fn frame_sphere(&mut self, sphere: &Sphere, limits: &ZoomLimits) -> Option<f64> {
        if sphere.is_degenerate() {
            return None;
        }
        let half_fov = (self.fov_deg * 0.5).to_radians();
        let distance = limits.clamp(sphere.radius * FRAME_MARGIN / half_fov.sin());
        self.target = sphere.center;
        self.eye = sphere.center + DVec3::Z * distance;
        self.near = distance / CLIP_RATIO;
        self.far = distance * CLIP_RATIO;
        Some(distance)
    }

    pub fn set_aspect(&mut self, viewport: &Viewport) {
        self.aspect = viewport.aspect();
    }
}
