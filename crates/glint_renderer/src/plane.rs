//! Infinite plane primitive.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId,
};
use glint_math::{Interval, Ray, Vec3, Vec3Ext};

/// The set of points P with (P - origin) . normal = 0.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    origin: Vec3,
    normal: Vec3,
    material: MaterialId,
}

impl Plane {
    /// Create a new plane. The normal is normalized here; a zero normal
    /// yields a plane that is never hit.
    pub fn new(origin: Vec3, normal: Vec3, material: MaterialId) -> Self {
        Self {
            origin,
            normal: normal.normalize_or_zero(),
            material,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        // Parallel rays miss, including rays lying in the plane
        if ray.direction().is_perpendicular_to(self.normal) {
            return None;
        }

        let t = (self.origin - ray.origin()).dot(self.normal) / ray.direction().dot(self.normal);
        if !ray_t.contains(t) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, self.material))
    }
}
