//! # SKYLINE Flythrough
//!
//! Headless drive of the city pipeline along a looping camera path. Logs
//! streaming and volumetric statistics in place of a renderer.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info flythrough --frames 600 --config config/skyline.toml
//! ```
//!
//! The config file is polled for changes every 60 frames.

use glam::Vec3;
use skyline::{Camera, CityPipeline};
use skyline_core::{ConfigWatcher, SkylineConfig, SkylineResult};
use std::path::PathBuf;
use std::time::Instant;

/// Frames between config file polls.
const CONFIG_POLL_INTERVAL: u64 = 60;
/// Camera speed in world units per frame.
const SPEED: f32 = 2.5;
/// Cruising altitude.
const ALTITUDE: f32 = 45.0;

struct Args {
    frames: u64,
    config: Option<PathBuf>,
}

fn parse_args() -> Option<Args> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        frames: 600,
        config: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--frames" | "-f" => {
                if i + 1 < args.len() {
                    parsed.frames = args[i + 1].parse().unwrap_or(parsed.frames);
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: flythrough [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -f, --frames <N>       Frames to simulate (default: 600)");
                println!("  -c, --config <PATH>    TOML config, polled for changes");
                println!("  -h, --help             Print this help");
                return None;
            }
            other => {
                tracing::warn!("Ignoring unknown argument: {other}");
            }
        }
        i += 1;
    }
    Some(parsed)
}

/// Camera on a slow figure-eight over the city, looking along its path.
#[allow(clippy::cast_precision_loss)]
fn camera_at(frame: u64, previous: &Camera) -> Camera {
    let t = frame as f32 * SPEED / 400.0;
    let position = Vec3::new(
        400.0 * t.sin(),
        ALTITUDE + 15.0 * (t * 3.0).sin(),
        300.0 * (2.0 * t).sin(),
    );
    let heading = position - previous.position;
    let yaw = if heading.length_squared() > 1e-6 {
        heading.x.atan2(-heading.z).to_degrees()
    } else {
        previous.yaw
    };
    Camera {
        position,
        yaw,
        pitch: -10.0,
        ..*previous
    }
}

fn run(args: &Args) -> SkylineResult<()> {
    let mut watcher = args.config.clone().map(ConfigWatcher::new);
    let config = match watcher.as_mut() {
        Some(watcher) => watcher.load()?,
        None => SkylineConfig::default(),
    };
    let mut pipeline = CityPipeline::new(config)?;

    let start = Instant::now();
    let mut camera = Camera::default();
    let mut peak_lights = 0;
    let mut peak_chunks = 0;

    for frame in 0..args.frames {
        camera = camera_at(frame, &camera);
        let stats = pipeline.frame(&camera);
        peak_lights = peak_lights.max(stats.volumetric.light_count);
        peak_chunks = peak_chunks.max(stats.resident_chunks);

        if stats.frame_index % CONFIG_POLL_INTERVAL == 0 {
            tracing::info!(
                "Frame {}: camera ({:.0}, {:.0}, {:.0}), {} chunks, {} lights, {} densities",
                stats.frame_index,
                camera.position.x,
                camera.position.y,
                camera.position.z,
                stats.resident_chunks,
                stats.volumetric.light_count,
                stats.volumetric.density_count
            );
            if let Some(watcher) = watcher.as_mut() {
                match watcher.poll() {
                    Ok(Some(config)) => {
                        if let Err(err) = pipeline.apply_config(config) {
                            tracing::warn!("Rejected reloaded config: {err}");
                        }
                    }
                    Ok(None) => {}
                    Err(err) => tracing::warn!("Config reload failed: {err}"),
                }
            }
        }
    }

    let elapsed = start.elapsed();
    let streamed = pipeline.streamer().stats();
    println!("Flythrough finished: {} frames in {elapsed:?}", args.frames);
    println!("  Peak resident chunks: {peak_chunks}");
    println!("  Peak volumetric lights: {peak_lights}");
    println!(
        "  Chunks generated: {}, evicted: {}",
        streamed.generated_total, streamed.evicted_total
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(args) = parse_args() else {
        return;
    };
    if let Err(err) = run(&args) {
        tracing::error!("Flythrough failed: {err}");
        std::process::exit(1);
    }
}
