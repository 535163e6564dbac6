//! # SKYLINE
//!
//! Procedural city pipeline for a volumetric renderer. Generates the city in
//! chunks around a moving camera and prepares the per-frame light and
//! density buffers the GPU froxel pass consumes.
//!
//! ## Crates
//!
//! - `skyline_core`: handles, errors, configuration
//! - `skyline_procedural`: deterministic chunked city generation and streaming
//! - `skyline_rendering`: frustum, light selection, froxel binning
//! - `skyline`: camera and pipeline orchestration
//!
//! ## Example
//!
//! ```rust
//! use glam::Vec3;
//! use skyline::{Camera, CityPipeline};
//! use skyline_core::SkylineConfig;
//!
//! let mut pipeline = CityPipeline::new(SkylineConfig::default()).unwrap();
//! let stats = pipeline.frame(&Camera::new(Vec3::new(0.0, 40.0, 0.0)));
//! assert!(stats.resident_chunks > 0);
//! assert!(stats.volumetric.light_count <= 1024);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod camera;
pub mod pipeline;

pub use camera::{Camera, MAX_PITCH};
pub use pipeline::{CityPipeline, PipelineStats};
