//! Image accumulation and encoding.
//!
//! The renderer hands over one summed color per pixel; this module averages
//! by the sample count, applies gamma 2 and writes PNG or ASCII PPM.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glint_math::{Color, Interval};
use thiserror::Error;

/// Errors that can occur when building or saving an image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Expected {expected} pixels for the image, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let unit = Interval::new(0.0, 1.0);
    let r = (255.0 * unit.clamp(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * unit.clamp(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * unit.clamp(linear_to_gamma(color.z))) as u8;
    [r, g, b, 255]
}

/// Row-major buffer of averaged linear colors, top row first.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Build an image from per-pixel sums of `spp` samples each.
    pub fn from_samples(
        width: u32,
        height: u32,
        sums: Vec<Color>,
        spp: u32,
    ) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize;
        if sums.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: sums.len(),
            });
        }

        let scale = 1.0 / spp.max(1) as f32;
        let pixels = sums.into_iter().map(|sum| sum * scale).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Get the pixel at (x, y), with y = 0 the top row.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y), with y = 0 the top row.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to gamma-corrected RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        let rgba: Vec<[u8; 4]> = self.pixels.iter().map(|&c| color_to_rgba(c)).collect();
        bytemuck::cast_slice::<[u8; 4], u8>(&rgba).to_vec()
    }

    /// Write an ASCII PPM (P3).
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for color in &self.pixels {
            let [r, g, b, _] = color_to_rgba(*color);
            writeln!(writer, "{} {} {}", r, g, b)?;
        }

        writer.flush()
    }

    /// Save to disk, choosing the format from the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "png" => {
                image::save_buffer(
                    path,
                    &self.to_rgba(),
                    self.width,
                    self.height,
                    image::ColorType::Rgba8,
                )?;
            }
            "ppm" => {
                let file = File::create(path)?;
                self.write_ppm(BufWriter::new(file))?;
            }
            other => return Err(ImageError::UnsupportedFormat(other.to_string())),
        }

        log::info!(
            "Wrote {}x{} image to {}",
            self.width,
            self.height,
            path.display()
        );
        Ok(())
    }
}
