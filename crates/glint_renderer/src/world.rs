//! Renderable world: the root object list plus the material arena it indexes.

use crate::{
    DiffuseLight, HitRecord, Hittable, HittableList, Lambertian, MaterialId, MaterialTable, Plane,
    Sphere,
};
use glint_core::{MaterialDescription, ObjectDescription, SceneDescription, SceneError};
use glint_math::{Interval, Ray};

/// Everything a ray can interact with.
#[derive(Default)]
pub struct World {
    pub objects: HittableList,
    pub materials: MaterialTable,
}

impl World {
    pub fn new(objects: HittableList, materials: MaterialTable) -> Self {
        Self { objects, materials }
    }

    /// Build geometry and materials from a scene description.
    ///
    /// The description is validated first, so every `MaterialId` in the
    /// resulting world resolves.
    pub fn from_description(desc: &SceneDescription) -> Result<Self, SceneError> {
        desc.validate()?;

        let mut materials = MaterialTable::new();
        for material in &desc.materials {
            match *material {
                MaterialDescription::Lambertian { color } => materials.add(Lambertian::new(color)),
                MaterialDescription::Light { color } => materials.add(DiffuseLight::new(color)),
            };
        }

        let mut objects = HittableList::new();
        for object in &desc.objects {
            match *object {
                ObjectDescription::Sphere {
                    center,
                    radius,
                    material,
                } => objects.add(Box::new(Sphere::new(center, radius, MaterialId(material)))),
                ObjectDescription::Plane {
                    origin,
                    normal,
                    material,
                } => objects.add(Box::new(Plane::new(origin, normal, MaterialId(material)))),
            }
        }

        log::info!(
            "Built world: {} objects, {} materials",
            objects.len(),
            materials.len()
        );

        Ok(Self { objects, materials })
    }
}

impl Hittable for World {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.objects.hit(ray, ray_t)
    }
}
