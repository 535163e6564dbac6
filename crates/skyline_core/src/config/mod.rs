//! # Configuration
//!
//! TOML-backed settings for the city generator, chunk streaming and the
//! volumetric light pipeline. Every field has a default, so a config file
//! only needs to name what it changes.
//!
//! ```toml
//! [city]
//! chunk_size = 64.0
//!
//! [volumetric]
//! max_light_distance = 400.0
//! ```

mod city;
mod streaming;
mod volumetric;
mod watcher;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SkylineError, SkylineResult};

pub use city::{BeamConfig, CityConfig, GroundLightConfig};
pub use streaming::StreamingConfig;
pub use volumetric::{
    FroxelGridConfig, VolumetricConfig, MAX_DENSITY_RECORDS, MAX_VOLUMETRIC_LIGHTS,
};
pub use watcher::ConfigWatcher;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkylineConfig {
    /// City generation.
    pub city: CityConfig,
    /// Chunk streaming.
    pub streaming: StreamingConfig,
    /// Light selection and froxel binning.
    pub volumetric: VolumetricConfig,
}

impl SkylineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::ConfigParse`] for malformed TOML and
    /// [`SkylineError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> SkylineResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::ConfigIo`] when the file cannot be read, plus
    /// every error of [`SkylineConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> SkylineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SkylineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serializes to a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::ConfigSerialize`] if serialization fails.
    pub fn to_toml_string(&self) -> SkylineResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> SkylineResult<()> {
        self.city.validate()?;
        self.streaming.validate()?;
        self.volumetric.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = SkylineConfig::from_toml_str("").unwrap();
        assert_eq!(config, SkylineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SkylineConfig::from_toml_str(
            r"
            [city]
            chunk_size = 64.0

            [streaming]
            evict = false
            ",
        )
        .unwrap();

        assert_eq!(config.city.chunk_size, 64.0);
        assert_eq!(config.city.buildings_per_chunk, CityConfig::default().buildings_per_chunk);
        assert!(!config.streaming.evict);
        assert_eq!(config.volumetric, VolumetricConfig::default());
    }

    #[test]
    fn test_invalid_value_rejected() {
        let result = SkylineConfig::from_toml_str("[city]\nbuilding_density = -0.5\n");
        assert!(matches!(result, Err(SkylineError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = SkylineConfig::from_toml_str("[city\n");
        assert!(matches!(result, Err(SkylineError::ConfigParse(_))));
    }
}
