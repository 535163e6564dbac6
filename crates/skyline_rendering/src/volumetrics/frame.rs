//! Per-frame volumetric update: selection, binning and buffer packing.

use glam::Vec3;
use skyline_core::VolumetricConfig;
use skyline_procedural::CityGenerator;

use super::froxel::{BinningStats, FroxelBinner};
use super::light_selection::{LightSelector, SelectionStats};
use super::records::{DensityBuffer, DensityRecord, LightBuffer, SelectedLight};
use crate::culling::Frustum;

/// Statistics of one volumetric update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Light selection counters.
    pub selection: SelectionStats,
    /// Froxel binning counters.
    pub binning: BinningStats,
    /// Records uploaded to the light buffer.
    pub light_count: usize,
    /// Records uploaded to the density buffer.
    pub density_count: usize,
}

/// Owns the selector, binner, per-frame lists and upload buffers.
pub struct VolumetricFrame {
    selector: LightSelector,
    binner: FroxelBinner,
    lights: Vec<SelectedLight>,
    densities: Vec<DensityRecord>,
    light_buffer: LightBuffer,
    density_buffer: DensityBuffer,
}

impl VolumetricFrame {
    /// Creates a frame with empty buffers.
    #[must_use]
    pub fn new(config: VolumetricConfig) -> Self {
        Self {
            selector: LightSelector::new(config.clone()),
            binner: FroxelBinner::new(config),
            lights: Vec::new(),
            densities: Vec::new(),
            light_buffer: LightBuffer::new(),
            density_buffer: DensityBuffer::new(),
        }
    }

    /// Applies a new configuration to the selector and binner.
    pub fn set_config(&mut self, config: VolumetricConfig) {
        self.selector.set_config(config.clone());
        self.binner.set_config(config);
    }

    /// Rebuilds the light and density lists from the resident city and
    /// uploads them.
    pub fn update(&mut self, frustum: &Frustum, camera: Vec3, world: &CityGenerator) -> FrameStats {
        let selection = self.selector.select(
            frustum,
            camera,
            world.neon_lights(),
            world.light_volumes(),
            &mut self.lights,
        );
        let binning = self.binner.bin(
            camera,
            world.buildings(),
            world.light_volumes(),
            &mut self.densities,
        );

        let light_count = self.light_buffer.upload(&self.lights);
        let density_count = self.density_buffer.upload(&self.densities);

        tracing::debug!(
            "Volumetrics: {light_count} lights ({} visible candidates), {density_count} densities",
            selection.visible_candidates
        );

        FrameStats {
            selection,
            binning,
            light_count,
            density_count,
        }
    }

    /// Returns the light selector.
    #[inline]
    #[must_use]
    pub fn selector(&self) -> &LightSelector {
        &self.selector
    }

    /// Returns the light selector for runtime scale adjustments.
    #[inline]
    pub fn selector_mut(&mut self) -> &mut LightSelector {
        &mut self.selector
    }

    /// Returns the froxel binner.
    #[inline]
    #[must_use]
    pub fn binner(&self) -> &FroxelBinner {
        &self.binner
    }

    /// Returns this frame's selected lights in priority order.
    #[inline]
    #[must_use]
    pub fn lights(&self) -> &[SelectedLight] {
        &self.lights
    }

    /// Returns this frame's density records.
    #[inline]
    #[must_use]
    pub fn densities(&self) -> &[DensityRecord] {
        &self.densities
    }

    /// Returns the packed light buffer.
    #[inline]
    #[must_use]
    pub fn light_buffer(&self) -> &LightBuffer {
        &self.light_buffer
    }

    /// Returns the packed density buffer.
    #[inline]
    #[must_use]
    pub fn density_buffer(&self) -> &DensityBuffer {
        &self.density_buffer
    }
}

impl Default for VolumetricFrame {
    fn default() -> Self {
        Self::new(VolumetricConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use skyline_core::CityConfig;

    #[test]
    fn test_update_matches_buffers() {
        let mut world = CityGenerator::new(CityConfig::default());
        for x in -1..=1 {
            for z in -1..=1 {
                world.generate_chunk(x, z, 42);
            }
        }

        let camera = Vec3::new(0.0, 30.0, 0.0);
        let view = Mat4::look_at_rh(camera, camera + Vec3::NEG_Z, Vec3::Y);
        let projection = Mat4::perspective_rh(60f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0);
        let frustum = Frustum::from_view_projection(&(projection * view));

        let mut frame = VolumetricFrame::default();
        let stats = frame.update(&frustum, camera, &world);

        assert_eq!(stats.light_count, frame.lights().len());
        assert_eq!(stats.light_count, frame.light_buffer().count());
        assert_eq!(stats.density_count, frame.density_buffer().count());
        assert_eq!(stats.light_count, stats.selection.total_records());
        assert_eq!(stats.density_count, stats.binning.total_records());
        assert!(stats.density_count > 0);
    }

    #[test]
    fn test_empty_world() {
        let world = CityGenerator::new(CityConfig::default());
        let mut frame = VolumetricFrame::default();
        let stats = frame.update(&Frustum::default(), Vec3::ZERO, &world);
        assert_eq!(stats, FrameStats::default());
    }
}
