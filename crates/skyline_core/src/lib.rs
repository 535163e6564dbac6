//! # SKYLINE Core
//!
//! Shared foundation for the skyline city pipeline:
//! - Generational handle pool for streamed chunk content
//! - Error type for the fallible edges (configuration)
//! - TOML configuration with validation and hot-reload polling
//!
//! ## Example
//!
//! ```rust
//! use skyline_core::{Pool, SkylineConfig};
//!
//! let config = SkylineConfig::default();
//! assert!(config.validate().is_ok());
//!
//! let mut pool = Pool::new();
//! let handle = pool.insert(config.city.chunk_size);
//! assert_eq!(pool.get(handle), Some(&50.0));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod memory;

pub use config::{
    BeamConfig, CityConfig, ConfigWatcher, FroxelGridConfig, GroundLightConfig, SkylineConfig,
    StreamingConfig, VolumetricConfig, MAX_DENSITY_RECORDS, MAX_VOLUMETRIC_LIGHTS,
};
pub use error::{SkylineError, SkylineResult};
pub use memory::{Handle, Pool};
