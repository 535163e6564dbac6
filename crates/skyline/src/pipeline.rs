//! # City Pipeline
//!
//! Per-frame orchestration:
//!
//! ```text
//! Camera → ChunkStreamer → CityGenerator (load / evict)
//!        → Frustum → VolumetricFrame → LightBuffer + DensityBuffer
//! ```

use skyline_core::{SkylineConfig, SkylineResult};
use skyline_procedural::{ChunkStreamer, CityGenerator, StreamUpdate};
use skyline_rendering::{FrameStats, Frustum, VolumetricFrame};

use crate::camera::Camera;

/// Everything one frame did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Frame counter, starting at 1.
    pub frame_index: u64,
    /// Chunks loaded and evicted this frame.
    pub stream: StreamUpdate,
    /// Volumetric selection and binning counters.
    pub volumetric: FrameStats,
    /// Chunks resident after streaming.
    pub resident_chunks: usize,
}

/// Owns the generator, the streamer and the volumetric frame.
pub struct CityPipeline {
    config: SkylineConfig,
    generator: CityGenerator,
    streamer: ChunkStreamer,
    volumetric: VolumetricFrame,
    frame_index: u64,
}

impl CityPipeline {
    /// Creates a pipeline with an empty city.
    ///
    /// # Errors
    ///
    /// Returns the validation error of an invalid configuration.
    pub fn new(config: SkylineConfig) -> SkylineResult<Self> {
        config.validate()?;
        Ok(Self {
            generator: CityGenerator::new(config.city.clone()),
            streamer: ChunkStreamer::new(config.streaming.clone()),
            volumetric: VolumetricFrame::new(config.volumetric.clone()),
            config,
            frame_index: 0,
        })
    }

    /// Streams chunks around the camera and rebuilds the volumetric buffers.
    pub fn frame(&mut self, camera: &Camera) -> PipelineStats {
        self.frame_index += 1;

        let stream = self
            .streamer
            .update(&mut self.generator, camera.position.x, camera.position.z);
        let frustum = Frustum::from_view_projection(&camera.view_projection());
        let volumetric = self.volumetric.update(&frustum, camera.position, &self.generator);

        PipelineStats {
            frame_index: self.frame_index,
            stream,
            volumetric,
            resident_chunks: self.generator.chunk_count(),
        }
    }

    /// Applies a reloaded configuration.
    ///
    /// A change to the city layout or the base seed drops every resident
    /// chunk; the next frame regenerates them.
    ///
    /// # Errors
    ///
    /// Returns the validation error and keeps the current configuration.
    pub fn apply_config(&mut self, config: SkylineConfig) -> SkylineResult<()> {
        config.validate()?;

        let city_changed = config.city != self.config.city;
        let seed_changed = config.streaming.base_seed != self.config.streaming.base_seed;
        if city_changed || seed_changed {
            tracing::info!(
                "City layout changed, dropping {} resident chunks",
                self.generator.chunk_count()
            );
            self.generator = CityGenerator::new(config.city.clone());
        }

        self.streamer.set_config(config.streaming.clone());
        self.volumetric.set_config(config.volumetric.clone());
        self.config = config;
        Ok(())
    }

    /// Steps the volumetric light intensity scale. Returns the new value.
    pub fn adjust_intensity_scale(&mut self, up: bool) -> f32 {
        self.volumetric.selector_mut().adjust_intensity_scale(up)
    }

    /// Steps the volumetric light radius scale. Returns the new value.
    pub fn adjust_radius_scale(&mut self, up: bool) -> f32 {
        self.volumetric.selector_mut().adjust_radius_scale(up)
    }

    /// Returns the active configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SkylineConfig {
        &self.config
    }

    /// Returns the city generator.
    #[inline]
    #[must_use]
    pub fn generator(&self) -> &CityGenerator {
        &self.generator
    }

    /// Returns the chunk streamer.
    #[inline]
    #[must_use]
    pub fn streamer(&self) -> &ChunkStreamer {
        &self.streamer
    }

    /// Returns the volumetric frame with its upload buffers.
    #[inline]
    #[must_use]
    pub fn volumetric(&self) -> &VolumetricFrame {
        &self.volumetric
    }

    /// Returns the number of frames run.
    #[inline]
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}
