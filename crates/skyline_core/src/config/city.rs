//! City generation parameters.

use serde::{Deserialize, Serialize};

use crate::error::{SkylineError, SkylineResult};

/// Parameters for procedural city generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// City width used by the legacy full-city path and the center offset.
    pub city_width: f32,
    /// City depth used by the legacy full-city path and the center offset.
    pub city_depth: f32,
    /// Probability that a grid cell receives a building (keep-probability).
    pub building_density: f32,
    /// Lowest building height.
    pub min_height: f32,
    /// Tallest building height.
    pub max_height: f32,
    /// Exponential falloff of the height distribution (higher = lower city).
    pub height_distribution_lambda: f32,
    /// Cells per side for the legacy full-city path.
    pub grid_size: u32,
    /// Distance between neighboring building cells.
    pub grid_spacing: f32,
    /// Side length of a chunk in world units.
    pub chunk_size: f32,
    /// Building cells per chunk side.
    pub buildings_per_chunk: u32,
    /// Ground-level cube light volumes.
    pub ground_lights: GroundLightConfig,
    /// Rooftop beam light volumes.
    pub beams: BeamConfig,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            city_width: 200.0,
            city_depth: 200.0,
            building_density: 0.7,
            min_height: 10.0,
            max_height: 50.0,
            height_distribution_lambda: 2.0,
            grid_size: 50,
            grid_spacing: 4.0,
            chunk_size: 50.0,
            buildings_per_chunk: 8,
            ground_lights: GroundLightConfig::default(),
            beams: BeamConfig::default(),
        }
    }
}

impl CityConfig {
    /// Offset added to every generated building position.
    ///
    /// Keeps chunked output aligned with the legacy full-city layout, which
    /// was centered on the world origin.
    #[inline]
    #[must_use]
    pub fn city_center_offset(&self) -> [f32; 2] {
        [-self.city_width * 0.5, -self.city_depth * 0.5]
    }

    /// Checks every value is usable by the generator.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> SkylineResult<()> {
        require_positive("city.chunk_size", self.chunk_size)?;
        require_positive("city.grid_spacing", self.grid_spacing)?;
        require_finite("city.city_width", self.city_width)?;
        require_finite("city.city_depth", self.city_depth)?;
        require_finite("city.height_distribution_lambda", self.height_distribution_lambda)?;

        if !(0.0..=1.0).contains(&self.building_density) {
            return Err(SkylineError::InvalidConfig(format!(
                "city.building_density must be within [0, 1], got {}",
                self.building_density
            )));
        }
        if !self.min_height.is_finite()
            || !self.max_height.is_finite()
            || self.min_height > self.max_height
        {
            return Err(SkylineError::InvalidConfig(format!(
                "city height range [{}, {}] is invalid",
                self.min_height, self.max_height
            )));
        }
        if self.buildings_per_chunk == 0 {
            return Err(SkylineError::InvalidConfig(
                "city.buildings_per_chunk must be at least 1".to_string(),
            ));
        }
        #[allow(clippy::cast_precision_loss)]
        let grid_extent = self.buildings_per_chunk as f32 * self.grid_spacing;
        if grid_extent > self.chunk_size {
            return Err(SkylineError::InvalidConfig(format!(
                "city building grid {} x {} = {grid_extent} does not fit chunk_size {}",
                self.buildings_per_chunk, self.grid_spacing, self.chunk_size
            )));
        }

        self.ground_lights.validate()?;
        self.beams.validate()
    }
}

/// Cube light volumes scattered between buildings at street level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundLightConfig {
    /// Placement attempts per chunk.
    pub attempts: u32,
    /// Maximum cubes placed per chunk.
    pub max_count: u32,
    /// Required gap to any building footprint.
    pub min_clearance: f32,
    /// Smallest cube height.
    pub min_height: f32,
    /// Largest cube height.
    pub max_height: f32,
    /// Smallest cube half-size.
    pub min_size: f32,
    /// Largest cube half-size.
    pub max_size: f32,
    /// Weakest intensity.
    pub min_intensity: f32,
    /// Strongest intensity.
    pub max_intensity: f32,
}

impl Default for GroundLightConfig {
    fn default() -> Self {
        Self {
            attempts: 100,
            max_count: 20,
            min_clearance: 15.0,
            min_height: 3.0,
            max_height: 8.0,
            min_size: 3.0,
            max_size: 7.0,
            min_intensity: 8.0,
            max_intensity: 20.0,
        }
    }
}

impl GroundLightConfig {
    fn validate(&self) -> SkylineResult<()> {
        require_range("ground_lights height", self.min_height, self.max_height)?;
        require_range("ground_lights size", self.min_size, self.max_size)?;
        require_range("ground_lights intensity", self.min_intensity, self.max_intensity)?;
        require_finite("ground_lights.min_clearance", self.min_clearance)
    }
}

/// Vertical light beams rising from tall rooftops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    /// Whether beams are generated at all.
    pub enabled: bool,
    /// Shortest beam.
    pub min_height: f32,
    /// Longest beam.
    pub max_height: f32,
    /// Narrowest base radius.
    pub min_radius: f32,
    /// Widest base radius.
    pub max_radius: f32,
    /// Weakest intensity.
    pub min_intensity: f32,
    /// Strongest intensity.
    pub max_intensity: f32,
    /// Probability that an eligible building gets beams.
    pub spawn_chance: f32,
    /// Buildings lower than this never get beams.
    pub min_building_height: f32,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_height: 180.0,
            max_height: 400.0,
            min_radius: 3.0,
            max_radius: 7.0,
            min_intensity: 8.0,
            max_intensity: 20.0,
            spawn_chance: 0.45,
            min_building_height: 40.0,
        }
    }
}

impl BeamConfig {
    fn validate(&self) -> SkylineResult<()> {
        require_range("beams height", self.min_height, self.max_height)?;
        require_range("beams radius", self.min_radius, self.max_radius)?;
        require_range("beams intensity", self.min_intensity, self.max_intensity)?;
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(SkylineError::InvalidConfig(format!(
                "beams.spawn_chance must be within [0, 1], got {}",
                self.spawn_chance
            )));
        }
        Ok(())
    }
}

pub(crate) fn require_positive(name: &str, value: f32) -> SkylineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SkylineError::InvalidConfig(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

pub(crate) fn require_finite(name: &str, value: f32) -> SkylineResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SkylineError::InvalidConfig(format!("{name} must be finite, got {value}")))
    }
}

pub(crate) fn require_range(name: &str, min: f32, max: f32) -> SkylineResult<()> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(SkylineError::InvalidConfig(format!(
            "{name} range [{min}, {max}] is invalid"
        )))
    }
}
