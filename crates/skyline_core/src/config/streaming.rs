//! Chunk streaming parameters.

use serde::{Deserialize, Serialize};

use super::city::require_positive;
use crate::error::{SkylineError, SkylineResult};

/// Controls which chunks are kept resident around the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chunks whose center is within this distance get generated.
    pub load_distance: f32,
    /// Chunks whose center is beyond this distance get evicted.
    pub unload_distance: f32,
    /// Evict far chunks. When false every generated chunk is kept forever.
    pub evict: bool,
    /// Base seed combined with chunk coordinates.
    pub base_seed: i32,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            load_distance: 150.0,
            unload_distance: 200.0,
            evict: true,
            base_seed: 42,
        }
    }
}

impl StreamingConfig {
    /// Checks the distances are usable.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::InvalidConfig`] when a distance is not positive
    /// or the unload distance is smaller than the load distance (chunks would
    /// thrash every frame).
    pub fn validate(&self) -> SkylineResult<()> {
        require_positive("streaming.load_distance", self.load_distance)?;
        require_positive("streaming.unload_distance", self.unload_distance)?;
        if self.unload_distance < self.load_distance {
            return Err(SkylineError::InvalidConfig(format!(
                "streaming.unload_distance ({}) must not be below load_distance ({})",
                self.unload_distance, self.load_distance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_streaming_is_valid() {
        assert!(StreamingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unload_below_load_rejected() {
        let config = StreamingConfig {
            load_distance: 300.0,
            unload_distance: 200.0,
            ..StreamingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
