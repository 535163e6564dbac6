//! Volumetric light selection and froxel binning parameters.

use serde::{Deserialize, Serialize};

use super::city::{require_finite, require_positive};
use crate::error::{SkylineError, SkylineResult};

/// Hard capacity of the GPU light record buffer.
pub const MAX_VOLUMETRIC_LIGHTS: usize = 1024;

/// Hard capacity of the GPU density record buffer.
pub const MAX_DENSITY_RECORDS: usize = 2048;

/// Camera-centered froxel grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FroxelGridConfig {
    /// Cells along X.
    pub width: u32,
    /// Cells along Y.
    pub height: u32,
    /// Cells along Z.
    pub depth: u32,
    /// Horizontal cell size (X and Z).
    pub cell_size_xz: f32,
    /// Vertical cell size.
    pub cell_size_y: f32,
}

impl Default for FroxelGridConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 96,
            depth: 160,
            cell_size_xz: 4.0,
            cell_size_y: 4.0,
        }
    }
}

impl FroxelGridConfig {
    /// Returns the grid dimensions as `[width, height, depth]`.
    #[inline]
    #[must_use]
    pub const fn dimensions(&self) -> [u32; 3] {
        [self.width, self.height, self.depth]
    }

    /// Returns the per-axis cell size.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> [f32; 3] {
        [self.cell_size_xz, self.cell_size_y, self.cell_size_xz]
    }
}

/// Parameters of the per-frame light selector and froxel binner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumetricConfig {
    /// Froxel grid layout.
    pub froxel: FroxelGridConfig,
    /// Lights farther than this are never considered.
    pub max_light_distance: f32,
    /// Extra slack added to influence spheres before the frustum test.
    pub frustum_margin: f32,
    /// Lights within this distance are kept even when off-screen.
    pub near_camera_always_keep: f32,
    /// Neon intensity multiplier.
    pub neon_intensity_multiplier: f32,
    /// Neon radius multiplier.
    pub neon_radius_multiplier: f32,
    /// Neon visual reach relative to its radius.
    pub neon_influence_multiplier: f32,
    /// Light volume visual reach relative to its extent.
    pub volume_influence_multiplier: f32,
    /// Initial runtime intensity scale. The default of 1.0 leaves the
    /// generated intensities untouched.
    pub light_intensity_scale: f32,
    /// Initial runtime radius scale. The default of 1.0 leaves the generated
    /// radii untouched.
    pub light_radius_scale: f32,
    /// Light record budget (at most [`MAX_VOLUMETRIC_LIGHTS`]).
    pub max_lights: usize,
    /// Density record budget (at most [`MAX_DENSITY_RECORDS`]).
    pub max_density_records: usize,
    /// Sphere records emitted per cone volume.
    pub cone_samples: u32,
    /// Density layers per cone volume.
    pub cone_layers: u32,
    /// Density layers per cube volume.
    pub cube_layers: u32,
    /// Sigma boost of a building silhouette.
    pub building_sigma: f32,
    /// Gray albedo of a building silhouette.
    pub building_albedo: f32,
}

impl Default for VolumetricConfig {
    fn default() -> Self {
        Self {
            froxel: FroxelGridConfig::default(),
            max_light_distance: 320.0,
            frustum_margin: 50.0,
            near_camera_always_keep: 100.0,
            neon_intensity_multiplier: 2.0,
            neon_radius_multiplier: 1.0,
            neon_influence_multiplier: 20.0,
            volume_influence_multiplier: 5.0,
            light_intensity_scale: 1.0,
            light_radius_scale: 1.0,
            max_lights: MAX_VOLUMETRIC_LIGHTS,
            max_density_records: MAX_DENSITY_RECORDS,
            cone_samples: 8,
            cone_layers: 8,
            cube_layers: 6,
            building_sigma: 0.05,
            building_albedo: 0.9,
        }
    }
}

impl VolumetricConfig {
    /// Checks budgets, distances and grid layout.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> SkylineResult<()> {
        let froxel = &self.froxel;
        if froxel.width == 0 || froxel.height == 0 || froxel.depth == 0 {
            return Err(SkylineError::InvalidConfig(format!(
                "froxel grid {}x{}x{} has a zero dimension",
                froxel.width, froxel.height, froxel.depth
            )));
        }
        require_positive("volumetric.froxel.cell_size_xz", froxel.cell_size_xz)?;
        require_positive("volumetric.froxel.cell_size_y", froxel.cell_size_y)?;

        require_positive("volumetric.max_light_distance", self.max_light_distance)?;
        require_finite("volumetric.frustum_margin", self.frustum_margin)?;
        require_finite("volumetric.near_camera_always_keep", self.near_camera_always_keep)?;
        require_finite("volumetric.neon_intensity_multiplier", self.neon_intensity_multiplier)?;
        require_positive("volumetric.neon_radius_multiplier", self.neon_radius_multiplier)?;
        require_positive("volumetric.neon_influence_multiplier", self.neon_influence_multiplier)?;
        require_positive(
            "volumetric.volume_influence_multiplier",
            self.volume_influence_multiplier,
        )?;
        require_positive("volumetric.light_intensity_scale", self.light_intensity_scale)?;
        require_positive("volumetric.light_radius_scale", self.light_radius_scale)?;

        if self.max_lights > MAX_VOLUMETRIC_LIGHTS {
            return Err(SkylineError::InvalidConfig(format!(
                "volumetric.max_lights {} exceeds buffer capacity {MAX_VOLUMETRIC_LIGHTS}",
                self.max_lights
            )));
        }
        if self.max_density_records > MAX_DENSITY_RECORDS {
            return Err(SkylineError::InvalidConfig(format!(
                "volumetric.max_density_records {} exceeds buffer capacity {MAX_DENSITY_RECORDS}",
                self.max_density_records
            )));
        }
        if self.cone_samples < 2 {
            return Err(SkylineError::InvalidConfig(
                "volumetric.cone_samples must be at least 2".to_string(),
            ));
        }
        if self.cone_layers == 0 || self.cube_layers == 0 {
            return Err(SkylineError::InvalidConfig(
                "volumetric layer counts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
