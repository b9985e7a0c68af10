#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn vec_approx_eq(a: DVec3, b: DVec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

// --- Aabb ---

#[test]
fn aabb_new_orders_corners() {
    let b = Aabb::new(DVec3::new(1.0, -2.0, 3.0), DVec3::new(-1.0, 2.0, -3.0));
    assert_eq!(b.min, DVec3::new(-1.0, -2.0, -3.0));
    assert_eq!(b.max, DVec3::new(1.0, 2.0, 3.0));
}

#[test]
fn aabb_from_points_empty_is_none() {
    assert!(Aabb::from_points(Vec::<DVec3>::new()).is_none());
}

#[test]
fn aabb_from_points_covers_all() {
    let b = Aabb::from_points([DVec3::new(1.0, 0.0, 0.0), DVec3::new(-2.0, 5.0, 1.0), DVec3::new(0.0, -1.0, 4.0)]).unwrap();
    assert_eq!(b.min, DVec3::new(-2.0, -1.0, 0.0));
    assert_eq!(b.max, DVec3::new(1.0, 5.0, 4.0));
}

#[test]
fn aabb_union_grows_to_both() {
    let a = Aabb::new(DVec3::ZERO, DVec3::ONE);
    let b = Aabb::new(DVec3::splat(-1.0), DVec3::splat(0.5));
    let u = a.union(b);
    assert_eq!(u.min, DVec3::splat(-1.0));
    assert_eq!(u.max, DVec3::ONE);
}

#[test]
fn aabb_bounding_sphere_uses_half_diagonal() {
    let b = Aabb::new(DVec3::new(1.0, 1.0, 1.0), DVec3::new(3.0, 3.0, 3.0));
    let s = b.bounding_sphere();
    assert!(vec_approx_eq(s.center, DVec3::splat(2.0)));
    assert!((s.radius - 3.0_f64.sqrt()).abs() < EPSILON);
}

// --- Sphere ---

#[test]
fn sphere_zero_radius_is_degenerate() {
    assert!(Sphere::new(DVec3::ZERO, 0.0).is_degenerate());
    assert!(Sphere::new(DVec3::ZERO, f64::NAN).is_degenerate());
    assert!(Sphere::new(DVec3::splat(f64::INFINITY), 1.0).is_degenerate());
    assert!(!Sphere::new(DVec3::ZERO, 0.5).is_degenerate());
}

#[test]
fn sphere_hit_by_ray_through_center() {
    let s = Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0);
    assert!(s.intersects(&Ray::new(DVec3::ZERO, DVec3::NEG_Z)));
}

#[test]
fn sphere_missed_by_offset_ray() {
    let s = Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0);
    assert!(!s.intersects(&Ray::new(DVec3::new(2.0, 0.0, 0.0), DVec3::NEG_Z)));
}

#[test]
fn sphere_behind_ray_is_missed() {
    let s = Sphere::new(DVec3::new(0.0, 0.0, 5.0), 1.0);
    assert!(!s.intersects(&Ray::new(DVec3::ZERO, DVec3::NEG_Z)));
}

#[test]
fn sphere_hit_from_inside() {
    let s = Sphere::new(DVec3::ZERO, 1.0);
    assert!(s.intersects(&Ray::new(DVec3::ZERO, DVec3::X)));
}

// --- Ray ---

#[test]
fn ray_direction_is_normalized() {
    let r = Ray::new(DVec3::ZERO, DVec3::new(0.0, 3.0, 4.0));
    assert!((r.direction.length() - 1.0).abs() < EPSILON);
    assert!(vec_approx_eq(r.at(5.0), DVec3::new(0.0, 3.0, 4.0)));
}

#[test]
fn ray_zero_direction_falls_back_to_forward() {
    let r = Ray::new(DVec3::ONE, DVec3::ZERO);
    assert_eq!(r.direction, DVec3::NEG_Z);
}

// --- Plane ---

#[test]
fn horizontal_plane_distance() {
    let p = Plane::horizontal(2.0);
    assert_eq!(p.distance_to(DVec3::new(7.0, 5.0, -1.0)), 3.0);
    assert_eq!(p.distance_to(DVec3::new(0.0, 2.0, 0.0)), 0.0);
}

#[test]
fn downward_ray_hits_ground() {
    let ground = Plane::horizontal(0.0);
    let ray = Ray::new(DVec3::new(1.0, 4.0, 2.0), DVec3::new(1.0, -1.0, 0.0));
    let hit = ground.intersect(&ray).unwrap();
    assert!(vec_approx_eq(hit, DVec3::new(5.0, 0.0, 2.0)));
}

#[test]
fn upward_ray_misses_ground() {
    let ground = Plane::horizontal(0.0);
    let ray = Ray::new(DVec3::new(0.0, 1.0, 0.0), DVec3::Y);
    assert!(ground.intersect(&ray).is_none());
}

#[test]
fn parallel_ray_misses_unless_on_plane() {
    let ground = Plane::horizontal(0.0);
    assert!(ground.intersect(&Ray::new(DVec3::new(0.0, 1.0, 0.0), DVec3::X)).is_none());
    let on = ground.intersect(&Ray::new(DVec3::new(3.0, 0.0, 0.0), DVec3::X)).unwrap();
    assert_eq!(on, DVec3::new(3.0, 0.0, 0.0));
}
