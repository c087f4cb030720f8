//! Vector predicates used by the intersection and scattering code.
//!
//! `Vec3` itself is `glam::Vec3`; it doubles as an RGB color.

use glam::Vec3;

/// Color type alias (linear RGB, unbounded).
pub type Color = Vec3;

/// Tolerance for the near-zero and perpendicularity tests.
pub const EPS: f32 = 1e-8;

/// Extra tests on `Vec3` that glam doesn't provide.
pub trait Vec3Ext {
    /// True if every component is smaller than [`EPS`] in magnitude.
    fn near_zero(&self) -> bool;

    /// True if the dot product with `other` is smaller than [`EPS`] in magnitude.
    fn is_perpendicular_to(&self, other: Vec3) -> bool;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn near_zero(&self) -> bool {
        self.x.abs() < EPS && self.y.abs() < EPS && self.z.abs() < EPS
    }

    #[inline]
    fn is_perpendicular_to(&self, other: Vec3) -> bool {
        self.dot(other).abs() < EPS
    }
}
