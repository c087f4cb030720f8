//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Path walking with a depth budget
//! - Anti-aliasing via jittered multi-sampling
//! - Row-parallel rendering with one seeded generator per row
//!
//! Pixel colors leave this module as sums over `samples_per_pixel` samples.
//! Averaging and tone mapping belong to the image buffer.

use std::fmt;
use std::time::{Duration, Instant};

use crate::{Camera, Hittable, World};
use glint_core::OutputSettings;
use glint_math::sampling::gen_f32;
use glint_math::{Color, Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Color returned when a ray doesn't hit anything
    pub background: Color,
    /// Lower bound on hit distance, keeps scattered rays from re-hitting
    /// the surface they leave
    pub t_min: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            t_min: 0.001,
        }
    }
}

impl RenderConfig {
    /// Take image size and sampling budget from a scene's output settings.
    pub fn from_output(output: &OutputSettings) -> Self {
        Self {
            width: output.width,
            height: output.height,
            samples_per_pixel: output.spp,
            max_depth: output.depth,
            ..Self::default()
        }
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Compute the color seen by a ray.
///
/// Each bounce adds the surface's emission weighted by the product of all
/// attenuations so far. The walk ends on a miss (background), on a material
/// that doesn't scatter, or after `depth` surface hits, contributing black
/// beyond that point. Stack use doesn't grow with `depth`.
pub fn ray_color(
    ray: &Ray,
    world: &World,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let hit_interval = Interval::new(config.t_min, f32::INFINITY);
    let mut ray = *ray;
    let mut throughput = Color::ONE;
    let mut radiance = Color::ZERO;

    for _ in 0..depth {
        let rec = match world.hit(&ray, hit_interval) {
            Some(rec) => rec,
            None => return radiance + throughput * config.background,
        };

        let material = world.materials.get(rec.material);
        radiance += throughput * material.emitted();

        match material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            None => return radiance,
        }
    }

    // Depth budget spent, no more light is gathered
    radiance
}

/// Sum `samples_per_pixel` jittered samples for pixel (col, row), with row 0
/// at the bottom of the image.
pub fn render_pixel(
    camera: &Camera,
    world: &World,
    col: u32,
    row: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // Single-pixel axes would otherwise divide by zero
    let u_scale = config.width.saturating_sub(1).max(1) as f32;
    let v_scale = config.height.saturating_sub(1).max(1) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (col as f32 + gen_f32(rng)) / u_scale;
        let t = (row as f32 + gen_f32(rng)) / v_scale;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, config, rng);
    }

    pixel_color
}

/// Walk every pixel from the top row down, left to right, handing each
/// summed color to `yield_pixel`.
pub fn render_with<F>(
    camera: &Camera,
    world: &World,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
    mut yield_pixel: F,
) where
    F: FnMut(Color),
{
    for row in (0..config.height).rev() {
        for col in 0..config.width {
            yield_pixel(render_pixel(camera, world, col, row, config, rng));
        }
    }
}

/// Render the entire image on the current thread.
///
/// Returns summed colors in output order (top row first).
pub fn render(
    camera: &Camera,
    world: &World,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Vec<Color> {
    let start = Instant::now();
    let mut pixels = Vec::with_capacity(config.pixel_count());
    render_with(camera, world, config, rng, |color| pixels.push(color));

    log::info!("{}", RenderStats::new(config, start.elapsed()));
    pixels
}

/// Render the entire image across the rayon thread pool.
///
/// Each image row gets its own generator seeded from `seed` and the row
/// index, so the result depends only on `seed`, never on scheduling.
pub fn render_parallel(
    camera: &Camera,
    world: &World,
    config: &RenderConfig,
    seed: u64,
) -> Vec<Color> {
    let start = Instant::now();
    log::info!(
        "Rendering {}x{} @ {} spp, depth {} on {} threads",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        rayon::current_num_threads()
    );

    let rows: Vec<Vec<Color>> = (0..config.height)
        .into_par_iter()
        .rev()
        .map(|row| {
            let mut rng = row_rng(seed, row);
            (0..config.width)
                .map(|col| render_pixel(camera, world, col, row, config, &mut rng))
                .collect()
        })
        .collect();

    log::info!("{}", RenderStats::new(config, start.elapsed()));
    rows.concat()
}

fn row_rng(seed: u64, row: u32) -> StdRng {
    StdRng::seed_from_u64(seed ^ u64::from(row).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Summary of a finished render.
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    pub pixels: usize,
    pub camera_rays: u64,
    pub elapsed: Duration,
}

impl RenderStats {
    pub fn new(config: &RenderConfig, elapsed: Duration) -> Self {
        let pixels = config.pixel_count();
        Self {
            pixels,
            camera_rays: pixels as u64 * u64::from(config.samples_per_pixel),
            elapsed,
        }
    }

    /// Camera rays per second.
    pub fn rays_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.camera_rays as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rendered {} pixels ({} camera rays) in {:?} ({:.0} rays/s)",
            self.pixels,
            self.camera_rays,
            self.elapsed,
            self.rays_per_second()
        )
    }
}
