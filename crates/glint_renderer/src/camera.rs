//! Camera for ray generation.
//!
//! A thin-lens camera: rays start on a disk of radius `aperture / 2` around
//! the eye and pass through the image plane placed at the focus distance.
//! With zero aperture it degenerates to a pinhole.

use glint_core::CameraDescription;
use glint_math::sampling::random_in_unit_disk;
use glint_math::{Ray, Vec3};
use rand::RngCore;

/// Builder for [`Camera`]. Nothing is derived until [`CameraBuilder::build`].
#[derive(Debug, Clone, Copy)]
pub struct CameraBuilder {
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,
    vfov: f32,
    aspect_ratio: f32,
    aperture: f32,
    focus_dist: Option<f32>,
}

impl CameraBuilder {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings. `vfov` is the vertical field of view in degrees.
    pub fn with_lens(mut self, vfov: f32, aperture: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self
    }

    /// Set the distance to the plane of perfect focus.
    /// Defaults to the distance between `look_from` and `look_at`.
    pub fn with_focus_dist(mut self, focus_dist: f32) -> Self {
        self.focus_dist = Some(focus_dist);
        self
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Derive the camera basis and viewport.
    pub fn build(self) -> Camera {
        let focus_dist = self
            .focus_dist
            .unwrap_or_else(|| (self.look_from - self.look_at).length());

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = self.look_from;
        let horizontal = u * focus_dist * viewport_width;
        let vertical = v * focus_dist * viewport_height;
        let lower_left_corner = origin - (horizontal + vertical) / 2.0 - w * focus_dist;

        Camera {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: self.aperture / 2.0,
        }
    }
}

impl Default for CameraBuilder {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 45.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: None,
        }
    }
}

/// Camera for generating rays into the scene. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Start configuring a camera.
    pub fn builder() -> CameraBuilder {
        CameraBuilder::default()
    }

    /// Build a camera from a scene description.
    pub fn from_description(desc: &CameraDescription, aspect_ratio: f32) -> Self {
        Self::builder()
            .with_position(desc.from, desc.to, desc.vup)
            .with_lens(desc.vfov, desc.aperture)
            .with_focus_dist(desc.focus_distance())
            .with_aspect_ratio(aspect_ratio)
            .build()
    }

    /// Generate a ray through normalized image coordinates (s, t), with
    /// (0, 0) the bottom-left and (1, 1) the top-right of the image plane.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius <= 0.0 {
            Vec3::ZERO
        } else {
            let rd = random_in_unit_disk(rng) * self.lens_radius;
            self.u * rd.x + self.v * rd.y
        };

        let target = self.lower_left_corner + self.horizontal * s + self.vertical * t;
        Ray::new(self.origin + offset, target - self.origin - offset)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Orthonormal camera basis (u = right, v = up, w = backwards).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn lower_left_corner(&self) -> Vec3 {
        self.lower_left_corner
    }

    pub fn horizontal(&self) -> Vec3 {
        self.horizontal
    }

    pub fn vertical(&self) -> Vec3 {
        self.vertical
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}
