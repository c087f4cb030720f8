//! Scene description records.
//!
//! These are plain data: numbers, colors and material indices exactly as they
//! appear in a scene file. The renderer turns a validated description into
//! intersectable geometry; nothing here knows how to trace a ray.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use glint_math::{Color, Vec3, Vec3Ext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid output settings: {0}")]
    InvalidOutput(String),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Invalid material {index}: {reason}")]
    InvalidMaterial { index: usize, reason: String },

    #[error("Object {object} references material {material}, but only {count} materials are defined")]
    UnknownMaterial {
        object: usize,
        material: usize,
        count: usize,
    },

    #[error("Invalid object {index}: {reason}")]
    InvalidObject { index: usize, reason: String },
}

/// Image size and sampling budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel
    pub spp: u32,
    /// Maximum number of scatter events per camera ray
    pub depth: u32,
}

impl OutputSettings {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Camera placement and lens parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    pub from: Vec3,
    pub to: Vec3,
    #[serde(default = "default_vup")]
    pub vup: Vec3,
    /// Vertical field of view in degrees
    #[serde(default = "default_vfov")]
    pub vfov: f32,
    #[serde(default)]
    pub aperture: f32,
    /// Distance to the plane of perfect focus. Defaults to |from - to|.
    #[serde(default)]
    pub focus: Option<f32>,
}

fn default_vup() -> Vec3 {
    Vec3::Y
}

fn default_vfov() -> f32 {
    45.0
}

fn default_radius() -> f32 {
    1.0
}

fn default_normal() -> Vec3 {
    Vec3::Y
}

impl CameraDescription {
    /// Focus distance actually used by the camera.
    pub fn focus_distance(&self) -> f32 {
        self.focus.unwrap_or_else(|| (self.from - self.to).length())
    }
}

/// Entry in the material table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaterialDescription {
    /// Diffuse reflector
    Lambertian { color: Color },
    /// Emitter that never scatters
    Light { color: Color },
}

impl MaterialDescription {
    pub fn color(&self) -> Color {
        match self {
            MaterialDescription::Lambertian { color } | MaterialDescription::Light { color } => {
                *color
            }
        }
    }
}

/// Entry in the object table. `material` indexes the material table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectDescription {
    Sphere {
        #[serde(default)]
        center: Vec3,
        #[serde(default = "default_radius")]
        radius: f32,
        material: usize,
    },
    Plane {
        #[serde(default)]
        origin: Vec3,
        #[serde(default = "default_normal")]
        normal: Vec3,
        material: usize,
    },
}

impl ObjectDescription {
    pub fn material(&self) -> usize {
        match self {
            ObjectDescription::Sphere { material, .. } | ObjectDescription::Plane { material, .. } => {
                *material
            }
        }
    }
}

/// A complete scene: output settings, camera, materials and objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub output: OutputSettings,
    pub camera: CameraDescription,
    #[serde(default)]
    pub materials: Vec<MaterialDescription>,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

impl SceneDescription {
    /// Load and validate a scene from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let scene = Self::from_reader(BufReader::new(file))?;

        log::info!(
            "Loaded scene {}: {}x{} @ {} spp, {} materials, {} objects",
            path.display(),
            scene.output.width,
            scene.output.height,
            scene.output.spp,
            scene.materials.len(),
            scene.objects.len()
        );

        Ok(scene)
    }

    /// Parse and validate a scene from any reader (e.g. stdin).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SceneError> {
        let scene: SceneDescription = serde_json::from_reader(reader)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Parse and validate a scene from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        let scene: SceneDescription = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Check everything the renderer assumes about a scene.
    pub fn validate(&self) -> Result<(), SceneError> {
        self.validate_output()?;
        self.validate_camera()?;

        for (index, material) in self.materials.iter().enumerate() {
            if !material.color().is_finite() {
                return Err(SceneError::InvalidMaterial {
                    index,
                    reason: "color must be finite".into(),
                });
            }
        }

        if self.objects.is_empty() {
            log::warn!("Scene has no objects; every pixel will be background");
        }

        for (index, object) in self.objects.iter().enumerate() {
            let material = object.material();
            if material >= self.materials.len() {
                return Err(SceneError::UnknownMaterial {
                    object: index,
                    material,
                    count: self.materials.len(),
                });
            }

            match *object {
                ObjectDescription::Sphere { center, radius, .. } => {
                    if !center.is_finite() {
                        return Err(invalid_object(index, "sphere center must be finite"));
                    }
                    if !(radius.is_finite() && radius > 0.0) {
                        return Err(invalid_object(
                            index,
                            format!("sphere radius must be positive, got {}", radius),
                        ));
                    }
                }
                ObjectDescription::Plane { origin, normal, .. } => {
                    if !(origin.is_finite() && normal.is_finite()) {
                        return Err(invalid_object(index, "plane origin and normal must be finite"));
                    }
                    if normal.near_zero() {
                        return Err(invalid_object(index, "plane normal must be non-zero"));
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_output(&self) -> Result<(), SceneError> {
        let output = &self.output;
        if output.width == 0 || output.height == 0 {
            return Err(SceneError::InvalidOutput(format!(
                "image size must be at least 1x1, got {}x{}",
                output.width, output.height
            )));
        }
        if output.spp == 0 {
            return Err(SceneError::InvalidOutput(
                "samples per pixel must be at least 1".into(),
            ));
        }
        if output.depth == 0 {
            log::warn!("Max depth is 0; the image will be black");
        }
        Ok(())
    }

    fn validate_camera(&self) -> Result<(), SceneError> {
        let camera = &self.camera;
        if !(camera.from.is_finite() && camera.to.is_finite() && camera.vup.is_finite()) {
            return Err(SceneError::InvalidCamera(
                "from, to and vup must be finite".into(),
            ));
        }

        let view = camera.from - camera.to;
        if view.near_zero() {
            return Err(SceneError::InvalidCamera(
                "from and to must be different points".into(),
            ));
        }
        if camera.vup.cross(view).near_zero() {
            return Err(SceneError::InvalidCamera(
                "vup must not be parallel to the view direction".into(),
            ));
        }
        if !(camera.vfov > 0.0 && camera.vfov < 180.0) {
            return Err(SceneError::InvalidCamera(format!(
                "vfov must be in (0, 180) degrees, got {}",
                camera.vfov
            )));
        }
        if !(camera.aperture.is_finite() && camera.aperture >= 0.0) {
            return Err(SceneError::InvalidCamera(format!(
                "aperture must be non-negative, got {}",
                camera.aperture
            )));
        }
        let focus = camera.focus_distance();
        if !(focus.is_finite() && focus > 0.0) {
            return Err(SceneError::InvalidCamera(format!(
                "focus distance must be positive, got {}",
                focus
            )));
        }
        Ok(())
    }
}

fn invalid_object(index: usize, reason: impl Into<String>) -> SceneError {
    SceneError::InvalidObject {
        index,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORNELL_ISH: &str = r#"{
        "output": { "width": 40, "height": 20, "spp": 4, "depth": 5 },
        "camera": { "from": [0, 1, 3], "to": [0, 0, -1], "vfov": 60, "aperture": 0.1 },
        "materials": [
            { "type": "lambertian", "color": [0.8, 0.3, 0.3] },
            { "type": "light", "color": [4, 4, 4] }
        ],
        "objects": [
            { "type": "sphere", "center": [0, 0, -1], "radius": 0.5, "material": 0 },
            { "type": "plane", "origin": [0, -0.5, 0], "normal": [0, 1, 0], "material": 0 },
            { "type": "sphere", "center": [0, 3, -1], "radius": 1, "material": 1 }
        ]
    }"#;

    fn with_objects(objects: &str) -> String {
        format!(
            r#"{{
                "output": {{ "width": 4, "height": 4, "spp": 1, "depth": 2 }},
                "camera": {{ "from": [0, 0, 0], "to": [0, 0, -1] }},
                "materials": [ {{ "type": "lambertian", "color": [0.5, 0.5, 0.5] }} ],
                "objects": {}
            }}"#,
            objects
        )
    }

    #[test]
    fn test_parse_full_scene() {
        let scene = SceneDescription::from_json_str(CORNELL_ISH).unwrap();

        assert_eq!(scene.output.width, 40);
        assert_eq!(scene.output.aspect_ratio(), 2.0);
        assert_eq!(scene.materials.len(), 2);
        assert_eq!(
            scene.materials[1],
            MaterialDescription::Light {
                color: Color::splat(4.0)
            }
        );
        assert_eq!(scene.objects.len(), 3);
        assert_eq!(
            scene.objects[1],
            ObjectDescription::Plane {
                origin: Vec3::new(0.0, -0.5, 0.0),
                normal: Vec3::Y,
                material: 0
            }
        );
    }

    #[test]
    fn test_camera_defaults() {
        let scene = SceneDescription::from_json_str(CORNELL_ISH).unwrap();
        let camera = scene.camera;

        assert_eq!(camera.vup, Vec3::Y);
        assert_eq!(camera.vfov, 60.0);
        assert_eq!(camera.focus, None);
        let expected = (Vec3::new(0.0, 1.0, 3.0) - Vec3::new(0.0, 0.0, -1.0)).length();
        assert!((camera.focus_distance() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_explicit_focus_is_used() {
        let json = CORNELL_ISH.replace(r#""aperture": 0.1"#, r#""aperture": 0.1, "focus": 2.5"#);
        let scene = SceneDescription::from_json_str(&json).unwrap();
        assert_eq!(scene.camera.focus_distance(), 2.5);
    }

    #[test]
    fn test_object_defaults() {
        let json = with_objects(r#"[ { "type": "sphere", "material": 0 }, { "type": "plane", "material": 0 } ]"#);
        let scene = SceneDescription::from_json_str(&json).unwrap();

        assert_eq!(
            scene.objects[0],
            ObjectDescription::Sphere {
                center: Vec3::ZERO,
                radius: 1.0,
                material: 0
            }
        );
        assert_eq!(
            scene.objects[1],
            ObjectDescription::Plane {
                origin: Vec3::ZERO,
                normal: Vec3::Y,
                material: 0
            }
        );
    }

    #[test]
    fn test_unknown_material_rejected() {
        let json = with_objects(r#"[ { "type": "sphere", "radius": 1, "material": 3 } ]"#);
        let err = SceneDescription::from_json_str(&json).unwrap_err();
        assert!(matches!(
            err,
            SceneError::UnknownMaterial {
                object: 0,
                material: 3,
                count: 1
            }
        ));
    }

    #[test]
    fn test_zero_radius_rejected() {
        let json = with_objects(r#"[ { "type": "sphere", "radius": 0, "material": 0 } ]"#);
        let err = SceneDescription::from_json_str(&json).unwrap_err();
        assert!(matches!(err, SceneError::InvalidObject { index: 0, .. }));
    }

    #[test]
    fn test_zero_plane_normal_rejected() {
        let json = with_objects(r#"[ { "type": "plane", "normal": [0, 0, 0], "material": 0 } ]"#);
        let err = SceneDescription::from_json_str(&json).unwrap_err();
        assert!(matches!(err, SceneError::InvalidObject { index: 0, .. }));
    }

    #[test]
    fn test_unknown_type_is_parse_error() {
        let json = with_objects(r#"[ { "type": "torus", "material": 0 } ]"#);
        let err = SceneDescription::from_json_str(&json).unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }

    #[test]
    fn test_zero_spp_rejected() {
        let json = CORNELL_ISH.replace(r#""spp": 4"#, r#""spp": 0"#);
        let err = SceneDescription::from_json_str(&json).unwrap_err();
        assert!(matches!(err, SceneError::InvalidOutput(_)));
    }

    #[test]
    fn test_degenerate_camera_rejected() {
        let same_point = CORNELL_ISH.replace(r#""to": [0, 0, -1]"#, r#""to": [0, 1, 3]"#);
        assert!(matches!(
            SceneDescription::from_json_str(&same_point).unwrap_err(),
            SceneError::InvalidCamera(_)
        ));

        let looking_up = CORNELL_ISH.replace(r#""to": [0, 0, -1]"#, r#""to": [0, 5, 3]"#);
        assert!(matches!(
            SceneDescription::from_json_str(&looking_up).unwrap_err(),
            SceneError::InvalidCamera(_)
        ));
    }

    #[test]
    fn test_from_reader() {
        let scene = SceneDescription::from_reader(CORNELL_ISH.as_bytes()).unwrap();
        assert_eq!(scene.objects.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SceneDescription::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SceneError::Io(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let _ = env_logger::builder().is_test(true).try_init();

        let path = std::env::temp_dir().join(format!("glint_scene_{}.json", std::process::id()));
        std::fs::write(&path, CORNELL_ISH).unwrap();
        let scene = SceneDescription::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(scene.output.spp, 4);
    }
}
