//! glint - render a JSON scene description to an image.

use anyhow::{Context, Result};
use clap::Parser;
use glint_core::{ImageBuffer, SceneDescription};
use glint_renderer::{render_parallel, Camera, RenderConfig, World};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "glint")]
#[command(about = "CPU path tracer for sphere and plane scenes", long_about = None)]
struct Cli {
    /// Scene description (JSON). Use `-` to read from stdin.
    scene: PathBuf,

    /// Output image; format is taken from the extension (.png or .ppm)
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Seed for the per-row random streams
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads (defaults to one per core)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Override the scene's samples per pixel
    #[arg(long)]
    spp: Option<u32>,

    /// Override the scene's maximum bounce depth
    #[arg(long)]
    depth: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the render thread pool")?;
    }

    let mut scene = load_scene(&cli.scene)?;
    if let Some(spp) = cli.spp {
        scene.output.spp = spp;
    }
    if let Some(depth) = cli.depth {
        scene.output.depth = depth;
    }

    let world = World::from_description(&scene).context("Invalid scene")?;
    let camera = Camera::from_description(&scene.camera, scene.output.aspect_ratio());
    let config = RenderConfig::from_output(&scene.output);

    let sums = render_parallel(&camera, &world, &config, cli.seed);

    let image = ImageBuffer::from_samples(config.width, config.height, sums, config.samples_per_pixel)?;
    image
        .save(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    Ok(())
}

fn load_scene(path: &Path) -> Result<SceneDescription> {
    if path.as_os_str() == "-" {
        log::info!("Reading scene from stdin");
        return SceneDescription::from_reader(io::stdin().lock())
            .context("Failed to read scene from stdin");
    }

    SceneDescription::load(path).with_context(|| format!("Failed to load {}", path.display()))
}
