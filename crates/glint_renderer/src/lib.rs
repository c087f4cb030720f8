//! glint Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over spheres and planes with diffuse and
//! emissive materials. Scene descriptions come from `glint_core`; this crate
//! turns them into intersectable geometry and integrates radiance per pixel.

mod camera;
mod hittable;
mod material;
mod plane;
mod renderer;
mod sphere;
mod world;

pub use camera::{Camera, CameraBuilder};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{DiffuseLight, Lambertian, Material, MaterialId, MaterialTable, ScatterResult};
pub use plane::Plane;
pub use renderer::{
    ray_color, render, render_parallel, render_pixel, render_with, RenderConfig, RenderStats,
};
pub use sphere::Sphere;
pub use world::World;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Color, Interval, Ray, Vec3, Vec3Ext};
