//! # SKYLINE Procedural Generation
//!
//! Deterministic city generation in streamable chunks.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same chunk and base seed always produce the same
//!    buildings, branches and lights
//! 2. **Chunked**: The city is generated in fixed-size square chunks
//! 3. **Streamable**: Chunks can be generated and removed independently;
//!    handles owned by one chunk never go stale because another was removed
//!
//! ## Core Components
//!
//! - `chunk_seed`: Coordinate hash that seeds each chunk's random stream
//! - `CityGenerator`: Produces buildings, neon lights and light volumes
//! - `ChunkStreamer`: Loads chunks near the camera, evicts far ones
//!
//! ## Example
//!
//! ```rust
//! use skyline_core::{CityConfig, StreamingConfig};
//! use skyline_procedural::{ChunkStreamer, CityGenerator};
//!
//! let mut generator = CityGenerator::new(CityConfig::default());
//! let mut streamer = ChunkStreamer::new(StreamingConfig::default());
//!
//! let update = streamer.update(&mut generator, 0.0, 0.0);
//! assert!(generator.has_chunk(update.center));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod building;
pub mod chunk;
pub mod city;
pub mod generator;
pub mod seed;
pub mod streaming;

pub use chunk::{ChunkKey, ChunkRecord};
pub use city::{Building, BuildingPart, CityContent, Face, LightVolume, NeonLight, MAX_BRANCH_DEPTH};
pub use generator::CityGenerator;
pub use seed::chunk_seed;
pub use streaming::{ChunkStreamer, StreamStats, StreamUpdate};
