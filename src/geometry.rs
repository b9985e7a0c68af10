//! World-space primitives: boxes, spheres, rays and planes.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use glam::DVec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    #[must_use]
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min: min.min(max), max: min.max(max) }
    }

    /// Smallest box containing every point, or `None` for an empty set.
    #[must_use]
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = DVec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |acc, p| Self { min: acc.min.min(p), max: acc.max.max(p) }))
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(self, other: Aabb) -> Self {
        Self { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Sphere centered on the box with the half diagonal as radius.
    #[must_use]
    pub fn bounding_sphere(&self) -> Sphere {
        Sphere { center: self.center(), radius: (self.max - self.min).length() * 0.5 }
    }
}

/// Bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
}

impl Sphere {
    #[must_use]
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Whether the sphere is too small (or malformed) to scale or frame.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.radius.is_finite() && self.radius > crate::consts::DEGENERATE_RADIUS) || !self.center.is_finite()
    }

    /// Whether `ray` passes within the sphere.
    #[must_use]
    pub fn intersects(&self, ray: &Ray) -> bool {
        let to_center = self.center - ray.origin;
        let along = to_center.dot(ray.direction);
        let closest_sq = to_center.length_squared() - along * along;
        let radius_sq = self.radius * self.radius;
        if closest_sq > radius_sq {
            return false;
        }
        // Behind the origin only counts when the origin is inside the sphere.
        along >= 0.0 || to_center.length_squared() <= radius_sq
    }
}

/// Half-line from `origin` along a unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Build a ray; the direction is normalized, falling back to `-Z` when zero.
    #[must_use]
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction: direction.try_normalize().unwrap_or(DVec3::NEG_Z) }
    }

    #[must_use]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Plane `normal · p + constant = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: DVec3,
    pub constant: f64,
}

impl Plane {
    /// Horizontal plane at height `y`, facing up.
    #[must_use]
    pub fn horizontal(y: f64) -> Self {
        Self { normal: DVec3::Y, constant: -y }
    }

    /// Signed distance from `point` to the plane.
    #[must_use]
    pub fn distance_to(&self, point: DVec3) -> f64 {
        self.normal.dot(point) + self.constant
    }

    /// Where `ray` crosses the plane, if it does so in front of its origin.
    ///
    /// A ray parallel to the plane only intersects when its origin lies on it.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<DVec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < f64::EPSILON {
            return (self.distance_to(ray.origin).abs() < f64::EPSILON).then_some(ray.origin);
        }
        let t = -self.distance_to(ray.origin) / denom;
        (t >= 0.0).then(|| ray.at(t))
    }
}
