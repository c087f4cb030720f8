//! glint Core - Scene description and image output for the glint renderer.
//!
//! This crate provides:
//!
//! - **Scene description**: `SceneDescription` and its output, camera,
//!   material and object records, loaded from JSON and validated
//! - **Image output**: `ImageBuffer` for averaging summed samples,
//!   gamma correction and PNG/PPM encoding
//!
//! # Example
//!
//! ```ignore
//! use glint_core::SceneDescription;
//!
//! let scene = SceneDescription::load("scene.json")?;
//! println!("Loaded {} materials, {} objects",
//!     scene.materials.len(),
//!     scene.objects.len());
//! ```

pub mod film;
pub mod scene;

// Re-export commonly used types
pub use film::{color_to_rgba, linear_to_gamma, ImageBuffer, ImageError};
pub use scene::{
    CameraDescription, MaterialDescription, ObjectDescription, OutputSettings, SceneDescription,
    SceneError,
};
