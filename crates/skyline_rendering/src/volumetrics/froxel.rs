//! # Froxel Binning
//!
//! Converts world-space boxes into cell ranges of the camera-centered froxel
//! grid. Buildings become thin density boxes; light volumes become stacks of
//! glowing layers.

use glam::Vec3;
use skyline_core::{VolumetricConfig, MAX_DENSITY_RECORDS};
use skyline_procedural::{Building, LightVolume};

use super::records::DensityRecord;

/// Smallest layer radius of a light volume.
const LAYER_MIN_RADIUS: f32 = 0.8;
/// Vertical overlap between consecutive layers.
const LAYER_OVERLAP: f32 = 2.0;
/// Sigma boost of the lowest layer.
const LAYER_SIGMA: f32 = 0.15;
/// Sigma reduction from bottom to top.
const LAYER_SIGMA_FALLOFF: f32 = 0.3;
/// Cone radius reduction from bottom to top.
const CONE_LAYER_TAPER: f32 = 0.4;
/// Albedo boost over the light color.
const LAYER_ALBEDO_BOOST: f32 = 1.2;

/// Per-frame binning counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinningStats {
    /// Buildings examined.
    pub building_candidates: usize,
    /// Light volumes examined.
    pub volume_candidates: usize,
    /// Records emitted for buildings.
    pub building_records: usize,
    /// Records emitted for light-volume layers.
    pub layer_records: usize,
    /// Boxes entirely outside the grid or non-finite.
    pub culled: usize,
    /// True if the budget cut off at least one record.
    pub truncated: bool,
}

impl BinningStats {
    /// Returns the total number of emitted records.
    #[inline]
    #[must_use]
    pub const fn total_records(&self) -> usize {
        self.building_records + self.layer_records
    }
}

/// Bins buildings and light volumes into the froxel grid.
#[derive(Debug, Clone, Default)]
pub struct FroxelBinner {
    config: VolumetricConfig,
}

impl FroxelBinner {
    /// Creates a binner.
    #[must_use]
    pub fn new(config: VolumetricConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &VolumetricConfig {
        &self.config
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: VolumetricConfig) {
        self.config = config;
    }

    /// Returns the effective record budget.
    #[inline]
    #[must_use]
    pub fn budget(&self) -> usize {
        self.config.max_density_records.min(MAX_DENSITY_RECORDS)
    }

    /// Returns the grid dimensions as floats.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn dimensions(&self) -> Vec3 {
        let [w, h, d] = self.config.froxel.dimensions();
        Vec3::new(w as f32, h as f32, d as f32)
    }

    /// Returns half the grid extent in world units.
    #[inline]
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        self.dimensions() * Vec3::from_array(self.config.froxel.cell_size()) * 0.5
    }

    /// Returns the unclamped, fractional cell coordinate of a world point.
    #[inline]
    #[must_use]
    pub fn world_to_froxel(&self, world: Vec3, camera: Vec3) -> Vec3 {
        (world - camera + self.half_extents()) / Vec3::from_array(self.config.froxel.cell_size())
    }

    /// Returns the covered cell range of a world box, or `None` if it lies
    /// entirely outside the grid.
    ///
    /// The outside test runs before clamping; bounds are then clamped to the
    /// grid with the minimum floored and the maximum ceiled. The maximum is
    /// exclusive.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cell_range(&self, min: Vec3, max: Vec3, camera: Vec3) -> Option<([u32; 3], [u32; 3])> {
        let lo = self.world_to_froxel(min, camera);
        let hi = self.world_to_froxel(max, camera);
        if !lo.is_finite() || !hi.is_finite() {
            return None;
        }

        let dims = self.dimensions();
        if lo.cmpge(dims).any() || hi.cmple(Vec3::ZERO).any() {
            return None;
        }

        let top = dims - Vec3::ONE;
        let lo = lo.clamp(Vec3::ZERO, top).floor();
        let hi = hi.clamp(Vec3::ZERO, top).ceil();
        Some((
            [lo.x as u32, lo.y as u32, lo.z as u32],
            [hi.x as u32, hi.y as u32, hi.z as u32],
        ))
    }

    /// Bins buildings then light-volume layers into `out` (cleared first).
    pub fn bin<'a>(
        &self,
        camera: Vec3,
        buildings: impl IntoIterator<Item = &'a Building>,
        light_volumes: impl IntoIterator<Item = &'a LightVolume>,
        out: &mut Vec<DensityRecord>,
    ) -> BinningStats {
        out.clear();
        let mut stats = BinningStats::default();
        let budget = self.budget();
        let building_albedo = Vec3::splat(self.config.building_albedo);

        for building in buildings {
            if out.len() >= budget {
                stats.truncated = true;
                break;
            }
            stats.building_candidates += 1;
            let (min, max) = building.trunk_bounds();
            let Some((min, max)) = self.cell_range(min, max, camera) else {
                stats.culled += 1;
                continue;
            };
            out.push(DensityRecord {
                min,
                max,
                sigma: self.config.building_sigma,
                albedo: building_albedo,
            });
            stats.building_records += 1;
        }

        if !stats.truncated {
            self.bin_volumes(camera, light_volumes, budget, out, &mut stats);
        }

        if stats.truncated {
            tracing::debug!(
                "Density budget {budget} exhausted after {} buildings and {} volumes",
                stats.building_candidates,
                stats.volume_candidates
            );
        }
        stats
    }

    #[allow(clippy::cast_precision_loss)]
    fn bin_volumes<'a>(
        &self,
        camera: Vec3,
        light_volumes: impl IntoIterator<Item = &'a LightVolume>,
        budget: usize,
        out: &mut Vec<DensityRecord>,
        stats: &mut BinningStats,
    ) {
        'volumes: for volume in light_volumes {
            stats.volume_candidates += 1;
            let layers = if volume.is_cone {
                self.config.cone_layers
            } else {
                self.config.cube_layers
            }
            .max(1);
            let step = volume.height / layers as f32;
            let albedo = volume.color * LAYER_ALBEDO_BOOST;

            for i in 0..layers {
                if out.len() >= budget {
                    stats.truncated = true;
                    break 'volumes;
                }
                let t = i as f32 / layers as f32;
                let taper = if volume.is_cone {
                    1.0 - t * CONE_LAYER_TAPER
                } else {
                    1.0
                };
                let radius = (volume.base_radius * taper).max(LAYER_MIN_RADIUS);
                let min = volume.base_position + Vec3::new(-radius, step * i as f32, -radius);
                let max = min + Vec3::new(radius * 2.0, step + LAYER_OVERLAP, radius * 2.0);

                let Some((min, max)) = self.cell_range(min, max, camera) else {
                    stats.culled += 1;
                    continue;
                };
                out.push(DensityRecord {
                    min,
                    max,
                    sigma: LAYER_SIGMA * (1.0 - t * LAYER_SIGMA_FALLOFF),
                    albedo,
                });
                stats.layer_records += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyline_procedural::BuildingPart;

    fn building(center: Vec3, size: Vec3) -> Building {
        Building {
            position: center,
            size,
            color: Vec3::splat(0.5),
            parts: vec![BuildingPart {
                position: Vec3::ZERO,
                size,
                color: Vec3::splat(0.5),
                detail_level: 0,
                parent: None,
            }],
            height_variation: 0.0,
            has_antenna: false,
        }
    }

    fn volume(base: Vec3, is_cone: bool) -> LightVolume {
        LightVolume {
            base_position: base,
            height: 40.0,
            base_radius: 5.0,
            color: Vec3::new(0.5, 0.25, 1.0),
            intensity: 10.0,
            is_cone,
        }
    }

    #[test]
    fn test_world_to_froxel_centered() {
        let binner = FroxelBinner::default();
        let camera = Vec3::new(100.0, 50.0, -40.0);
        assert_eq!(binner.world_to_froxel(camera, camera), Vec3::new(80.0, 48.0, 80.0));
    }

    #[test]
    fn test_building_inside_grid() {
        let binner = FroxelBinner::default();
        let mut out = Vec::new();
        let b = building(Vec3::ZERO, Vec3::new(10.0, 30.0, 10.0));
        let stats = binner.bin(Vec3::ZERO, [&b], [], &mut out);

        assert_eq!(stats.building_records, 1);
        assert_eq!(out[0].min, [78, 48, 78]);
        assert_eq!(out[0].max, [82, 56, 82]);
        assert_eq!(out[0].sigma, 0.05);
        assert_eq!(out[0].albedo, Vec3::splat(0.9));
    }

    #[test]
    fn test_cell_aligned_box_max_is_exclusive() {
        let binner = FroxelBinner::default();
        // Two cells per axis starting at the camera's cell
        let range = binner.cell_range(Vec3::ZERO, Vec3::splat(8.0), Vec3::ZERO);
        assert_eq!(range, Some(([80, 48, 80], [82, 50, 82])));
    }

    #[test]
    fn test_building_clamped_to_edge() {
        let binner = FroxelBinner::default();
        let mut out = Vec::new();
        let b = building(Vec3::new(320.0, 0.0, 0.0), Vec3::new(40.0, 10.0, 10.0));
        binner.bin(Vec3::ZERO, [&b], [], &mut out);

        assert_eq!(out[0].min[0], 155);
        assert_eq!(out[0].max[0], 159);
    }

    #[test]
    fn test_outside_boxes_culled() {
        let binner = FroxelBinner::default();
        let mut out = Vec::new();
        let beyond_x = building(Vec3::new(405.0, 0.0, 0.0), Vec3::splat(10.0));
        // Above the grid on y only; clamping first would have kept it
        let above = building(Vec3::new(0.0, 500.0, 0.0), Vec3::splat(20.0));
        let nan = building(Vec3::splat(f32::NAN), Vec3::splat(10.0));
        let stats = binner.bin(Vec3::ZERO, [&beyond_x, &above, &nan], [], &mut out);

        assert!(out.is_empty());
        assert_eq!(stats.culled, 3);
    }

    #[test]
    fn test_volume_layers() {
        let binner = FroxelBinner::default();
        let mut out = Vec::new();
        let cone = volume(Vec3::new(10.0, 0.0, 10.0), true);
        let cube = volume(Vec3::new(-10.0, 0.0, 10.0), false);
        let stats = binner.bin(Vec3::ZERO, [], [&cone, &cube], &mut out);

        assert_eq!(stats.layer_records, 8 + 6);
        assert!((out[0].sigma - 0.15).abs() < 1e-6);
        assert!(out[7].sigma < out[0].sigma);
        assert_eq!(out[0].albedo, Vec3::new(0.6, 0.3, 1.2));
        // Cone layers narrow with height; cube layers keep their width
        assert!(out[7].max[0] - out[7].min[0] <= out[0].max[0] - out[0].min[0]);
        assert_eq!(out[8].max[0] - out[8].min[0], out[13].max[0] - out[13].min[0]);
    }

    #[test]
    fn test_budget_truncates() {
        let binner = FroxelBinner::new(VolumetricConfig {
            max_density_records: 5,
            ..VolumetricConfig::default()
        });
        let buildings: Vec<_> = (0..10)
            .map(|i| building(Vec3::new(i as f32 * 12.0, 0.0, 0.0), Vec3::splat(8.0)))
            .collect();
        let cone = volume(Vec3::ZERO, true);
        let mut out = Vec::new();
        let stats = binner.bin(Vec3::ZERO, &buildings, [&cone], &mut out);

        assert_eq!(out.len(), 5);
        assert!(stats.truncated);
        assert_eq!(stats.layer_records, 0);
    }
}
