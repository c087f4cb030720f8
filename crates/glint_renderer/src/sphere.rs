//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId,
};
use glint_math::{Interval, Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: MaterialId,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero, and a
    /// zero-radius sphere never reports a hit.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        if self.radius <= 0.0 {
            return None;
        }

        // |O + tD - C|^2 = r^2 with half-b coefficients
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let half_b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (-half_b - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (-half_b + sqrtd) / a;
            if !ray_t.contains(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - self.center) / self.radius;
        Some(HitRecord::new(ray, root, outward_normal, self.material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_interval() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MaterialId(0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere.hit(&ray, unit_interval()).unwrap();

        assert_eq!(rec.t, 0.5);
        assert_eq!(rec.p, Vec3::new(0.0, 0.0, -0.5));
        assert_eq!(rec.normal, Vec3::Z);
        assert!(rec.front_face);
        assert_eq!(rec.material, MaterialId(0));
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MaterialId(0));

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, unit_interval()).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, MaterialId(0));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        // Near root is behind the origin, so the far root is used
        let rec = sphere.hit(&ray, unit_interval()).unwrap();

        assert_eq!(rec.t, 2.0);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::NEG_X);
    }

    #[test]
    fn test_sphere_both_roots_outside_interval() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MaterialId(0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert!(sphere.hit(&ray, Interval::new(0.001, 0.4)).is_none());
        assert!(sphere.hit(&ray, Interval::new(1.6, 10.0)).is_none());
        // Closed interval: the far root exactly at t_min still counts
        let rec = sphere.hit(&ray, Interval::new(1.5, 10.0)).unwrap();
        assert_eq!(rec.t, 1.5);
    }

    #[test]
    fn test_sphere_unnormalized_direction() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, MaterialId(0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));

        let rec = sphere.hit(&ray, unit_interval()).unwrap();

        assert_eq!(rec.t, 1.5);
        assert!((rec.normal.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_radius_sphere_never_hits() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.0, MaterialId(0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(sphere.hit(&ray, unit_interval()).is_none());

        let negative = Sphere::new(Vec3::ZERO, -3.0, MaterialId(0));
        assert_eq!(negative.radius(), 0.0);
    }
}
