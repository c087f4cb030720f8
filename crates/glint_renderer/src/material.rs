//! Material trait for surface scattering, plus the material arena.
//!
//! Primitives don't own their materials. They hold a [`MaterialId`] into a
//! [`MaterialTable`] owned by the world, so any number of shapes can share one
//! material.

use crate::hittable::HitRecord;
use glint_math::sampling::random_in_unit_sphere;
use glint_math::{Color, Ray, Vec3Ext};
use rand::RngCore;

/// Outgoing ray and color filter produced by a scatter event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed (or the material only emits).
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        // Normal plus a point in the unit ball (not renormalized) gives a
        // cosine-weighted lobe around the normal
        let mut scatter_direction = rec.normal + random_in_unit_sphere(rng);

        // Catch degenerate scatter direction
        if scatter_direction.near_zero() {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Diffuse light emitter.
#[derive(Debug, Clone, Copy)]
pub struct DiffuseLight {
    emit: Color,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self) -> Color {
        self.emit
    }
}

/// Handle to a material stored in a [`MaterialTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Arena owning every material in a scene.
#[derive(Default)]
pub struct MaterialTable {
    materials: Vec<Box<dyn Material>>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
        }
    }

    /// Store a material and return its handle.
    pub fn add<M: Material + 'static>(&mut self, material: M) -> MaterialId {
        self.materials.push(Box::new(material));
        MaterialId(self.materials.len() - 1)
    }

    /// Look up a material.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this table. Scene loading checks
    /// every index, so a dangling id is a bug in the caller.
    pub fn get(&self, id: MaterialId) -> &dyn Material {
        self.materials[id.0].as_ref()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hit_facing_up() -> (Ray, HitRecord) {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Y, MaterialId(0));
        (ray, rec)
    }

    #[test]
    fn test_lambertian_always_scatters_into_hemisphere() {
        let albedo = Color::new(0.8, 0.3, 0.3);
        let material = Lambertian::new(albedo);
        let (ray, rec) = hit_facing_up();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, albedo);
            assert_eq!(result.scattered.origin(), rec.p);
            // normal + point in the unit ball never points below the surface
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
            assert!(!result.scattered.direction().near_zero());
        }
        assert_eq!(material.emitted(), Color::ZERO);
    }

    /// Replays a fixed cycle of `u32` words.
    struct ScriptedRng {
        words: Vec<u32>,
        next: usize,
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            let word = self.words[self.next % self.words.len()];
            self.next += 1;
            word
        }

        fn next_u64(&mut self) -> u64 {
            u64::from(self.next_u32())
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(4) {
                let word = self.next_u32().to_le_bytes();
                chunk.copy_from_slice(&word[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_lambertian_cancelled_direction_falls_back_to_normal() {
        // Standard f32 keeps the top 24 bits: 1 << 31 gives 0.5 and 256
        // gives 2^-24, so the unit-ball sample is (0, -1 + 2^-23, 0)
        let mut rng = ScriptedRng {
            words: vec![0x8000_0000, 256, 0x8000_0000],
            next: 0,
        };
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let rec = HitRecord {
            p: Vec3::ZERO,
            normal: Vec3::new(0.0, 1.0 - f32::EPSILON, 0.0),
            material: MaterialId(0),
            t: 1.0,
            front_face: true,
        };

        let material = Lambertian::new(Color::splat(0.5));
        let result = material.scatter(&ray, &rec, &mut rng).unwrap();

        assert_eq!(rng.next, 3);
        assert_eq!(result.scattered.direction(), rec.normal);
        assert_eq!(result.scattered.origin(), rec.p);
    }

    #[test]
    fn test_diffuse_light_never_scatters() {
        let emit = Color::new(4.0, 3.0, 2.0);
        let light = DiffuseLight::new(emit);
        let mut rng = StdRng::seed_from_u64(42);

        let (ray, rec) = hit_facing_up();
        assert!(light.scatter(&ray, &rec, &mut rng).is_none());

        let grazing = Ray::new(Vec3::new(-5.0, 0.1, 0.0), Vec3::X);
        let back = HitRecord::new(&grazing, 3.0, Vec3::NEG_Y, MaterialId(3));
        assert!(light.scatter(&grazing, &back, &mut rng).is_none());

        assert_eq!(light.emitted(), emit);
    }

    #[test]
    fn test_material_table_handles() {
        let mut table = MaterialTable::new();
        assert!(table.is_empty());

        let diffuse = table.add(Lambertian::new(Color::splat(0.5)));
        let light = table.add(DiffuseLight::new(Color::ONE));

        assert_eq!(diffuse, MaterialId(0));
        assert_eq!(light, MaterialId(1));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(light).emitted(), Color::ONE);
        assert_eq!(table.get(diffuse).emitted(), Color::ZERO);
    }

    #[test]
    #[should_panic]
    fn test_material_table_dangling_id_panics() {
        let table = MaterialTable::new();
        let _ = table.get(MaterialId(0));
    }
}
