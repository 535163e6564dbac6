//! # Chunk Streaming
//!
//! Keeps the chunks around the camera resident:
//! 1. Every chunk whose center is within `load_distance` gets generated.
//! 2. Every resident chunk whose center is beyond `unload_distance` gets
//!    evicted (unless eviction is switched off).
//!
//! The gap between the two distances keeps chunks on the boundary from being
//! generated and evicted on alternating frames.

use skyline_core::StreamingConfig;

use crate::chunk::ChunkKey;
use crate::generator::CityGenerator;

/// Result of one streaming update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamUpdate {
    /// Chunk the camera is in.
    pub center: ChunkKey,
    /// Chunks generated by this update, sorted by key.
    pub loaded: Vec<ChunkKey>,
    /// Chunks evicted by this update, sorted by key.
    pub evicted: Vec<ChunkKey>,
}

impl StreamUpdate {
    /// Returns true if the update changed the resident set.
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.loaded.is_empty() || !self.evicted.is_empty()
    }
}

/// Session totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Chunks generated since creation.
    pub generated_total: u64,
    /// Chunks evicted since creation.
    pub evicted_total: u64,
}

/// Decides which chunks must exist around the camera.
#[derive(Debug, Clone)]
pub struct ChunkStreamer {
    config: StreamingConfig,
    last_center: Option<ChunkKey>,
    stats: StreamStats,
}

impl ChunkStreamer {
    /// Creates a streamer.
    #[must_use]
    pub fn new(config: StreamingConfig) -> Self {
        Self {
            config,
            last_center: None,
            stats: StreamStats::default(),
        }
    }

    /// Returns the streaming parameters.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Replaces the streaming parameters. Takes effect on the next update.
    pub fn set_config(&mut self, config: StreamingConfig) {
        self.config = config;
    }

    /// Returns the session totals.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Loads and evicts chunks for a camera at `(camera_x, camera_z)`.
    pub fn update(
        &mut self,
        generator: &mut CityGenerator,
        camera_x: f32,
        camera_z: f32,
    ) -> StreamUpdate {
        let chunk_size = generator.config().chunk_size;
        let offset = generator.config().city_center_offset();
        let center = generator.world_to_chunk(camera_x, camera_z);

        if self.last_center != Some(center) {
            tracing::debug!("Camera chunk: ({}, {})", center.x, center.z);
            self.last_center = Some(center);
        }

        let distance_sq = |key: ChunkKey| {
            let [cx, cz] = key.center(chunk_size, offset);
            let dx = camera_x - cx;
            let dz = camera_z - cz;
            dx * dx + dz * dz
        };

        let mut evicted = Vec::new();
        if self.config.evict {
            let unload_sq = self.config.unload_distance * self.config.unload_distance;
            evicted = generator
                .chunk_keys()
                .filter(|&key| distance_sq(key) > unload_sq)
                .collect();
            evicted.sort_unstable();
            for key in &evicted {
                generator.remove_chunk(key.x, key.z);
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let radius = (self.config.load_distance / chunk_size).ceil() as i32;
        let load_sq = self.config.load_distance * self.config.load_distance;

        // x outer, z inner: already sorted by key
        let mut loaded = Vec::new();
        for x in center.x - radius..=center.x + radius {
            for z in center.z - radius..=center.z + radius {
                let key = ChunkKey::new(x, z);
                if distance_sq(key) <= load_sq
                    && generator.generate_chunk(x, z, self.config.base_seed)
                {
                    loaded.push(key);
                }
            }
        }

        self.stats.generated_total += loaded.len() as u64;
        self.stats.evicted_total += evicted.len() as u64;

        if !loaded.is_empty() || !evicted.is_empty() {
            tracing::info!(
                "Streamed chunks around ({}, {}): +{} -{} ({} resident, {} buildings)",
                center.x,
                center.z,
                loaded.len(),
                evicted.len(),
                generator.chunk_count(),
                generator.building_count()
            );
        }

        StreamUpdate {
            center,
            loaded,
            evicted,
        }
    }
}

impl Default for ChunkStreamer {
    fn default() -> Self {
        Self::new(StreamingConfig::default())
    }
}
