//! # Light Selection
//!
//! Chooses the lights handed to the volumetric pass each frame.
//!
//! The GPU budget is hard, so selection is a priority problem:
//! - Distance cull at `max_light_distance`
//! - Influence sphere (plus margin) against the frustum decides visibility
//! - Off-screen lights survive only within `near_camera_always_keep`
//! - Visible candidates come first, nearest first, until the budget is spent
//!
//! Neon lights are ranked and emitted before light volumes.

use glam::Vec3;
use skyline_core::{VolumetricConfig, MAX_VOLUMETRIC_LIGHTS};
use skyline_procedural::{LightVolume, NeonLight};

use super::records::{LightShape, SelectedLight};
use crate::culling::Frustum;

/// Scale step applied by one runtime adjustment.
const SCALE_STEP_UP: f32 = 1.25;
/// Inverse scale step.
const SCALE_STEP_DOWN: f32 = 0.8;
/// Bounds of the runtime intensity scale.
const INTENSITY_SCALE_RANGE: (f32, f32) = (0.1, 10.0);
/// Bounds of the runtime radius scale.
const RADIUS_SCALE_RANGE: (f32, f32) = (0.1, 5.0);

/// Cone radius growth from base to tip.
const CONE_RADIUS_GROWTH: f32 = 1.2;
/// Cone intensity falloff from base to tip.
const CONE_INTENSITY_FALLOFF: f32 = 0.15;

#[derive(Debug, Clone, Copy)]
struct Candidate<T> {
    light: T,
    distance_sq: f32,
    visible: bool,
}

impl<T> Candidate<T> {
    /// Visible first, then nearest first. Distances are finite and
    /// non-negative, so their bit patterns order like the values.
    #[inline]
    fn priority(&self) -> (bool, u32) {
        (!self.visible, self.distance_sq.to_bits())
    }
}

/// Per-frame selection counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionStats {
    /// Neon lights that passed culling.
    pub neon_candidates: usize,
    /// Light volumes that passed culling.
    pub volume_candidates: usize,
    /// Candidates whose influence reaches the frustum.
    pub visible_candidates: usize,
    /// Sphere records emitted for neon lights.
    pub neon_records: usize,
    /// Records emitted for light volumes.
    pub volume_records: usize,
    /// Inputs dropped for non-finite values.
    pub discarded_non_finite: usize,
    /// True if the budget cut off at least one record.
    pub truncated: bool,
}

impl SelectionStats {
    /// Returns the total number of emitted records.
    #[inline]
    #[must_use]
    pub const fn total_records(&self) -> usize {
        self.neon_records + self.volume_records
    }
}

/// Budgeted light selector.
///
/// Candidate scratch buffers are kept across frames.
#[derive(Debug, Clone)]
pub struct LightSelector {
    config: VolumetricConfig,
    intensity_scale: f32,
    radius_scale: f32,
    neon_candidates: Vec<Candidate<NeonLight>>,
    volume_candidates: Vec<Candidate<LightVolume>>,
}

impl LightSelector {
    /// Creates a selector with the configured initial scales.
    #[must_use]
    pub fn new(config: VolumetricConfig) -> Self {
        let intensity_scale = clamp_scale(config.light_intensity_scale, INTENSITY_SCALE_RANGE);
        let radius_scale = clamp_scale(config.light_radius_scale, RADIUS_SCALE_RANGE);
        Self {
            config,
            intensity_scale,
            radius_scale,
            neon_candidates: Vec::new(),
            volume_candidates: Vec::new(),
        }
    }

    /// Returns the active configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &VolumetricConfig {
        &self.config
    }

    /// Replaces the configuration.
    ///
    /// Runtime scales survive unless the new config changes their initial
    /// values.
    #[allow(clippy::float_cmp)]
    pub fn set_config(&mut self, config: VolumetricConfig) {
        if config.light_intensity_scale != self.config.light_intensity_scale {
            self.intensity_scale = clamp_scale(config.light_intensity_scale, INTENSITY_SCALE_RANGE);
        }
        if config.light_radius_scale != self.config.light_radius_scale {
            self.radius_scale = clamp_scale(config.light_radius_scale, RADIUS_SCALE_RANGE);
        }
        self.config = config;
    }

    /// Returns the runtime intensity scale.
    #[inline]
    #[must_use]
    pub fn intensity_scale(&self) -> f32 {
        self.intensity_scale
    }

    /// Returns the runtime radius scale.
    #[inline]
    #[must_use]
    pub fn radius_scale(&self) -> f32 {
        self.radius_scale
    }

    /// Steps the intensity scale up or down. Returns the new value.
    pub fn adjust_intensity_scale(&mut self, up: bool) -> f32 {
        self.intensity_scale = step_scale(self.intensity_scale, up, INTENSITY_SCALE_RANGE);
        tracing::info!("Volumetric light intensity scale: {:.2}", self.intensity_scale);
        self.intensity_scale
    }

    /// Steps the radius scale up or down. Returns the new value.
    pub fn adjust_radius_scale(&mut self, up: bool) -> f32 {
        self.radius_scale = step_scale(self.radius_scale, up, RADIUS_SCALE_RANGE);
        tracing::info!("Volumetric light radius scale: {:.2}", self.radius_scale);
        self.radius_scale
    }

    /// Returns the effective record budget.
    #[inline]
    #[must_use]
    pub fn budget(&self) -> usize {
        self.config.max_lights.min(MAX_VOLUMETRIC_LIGHTS)
    }

    /// Selects lights for this frame into `out` (cleared first).
    pub fn select<'a>(
        &mut self,
        frustum: &Frustum,
        camera: Vec3,
        neon_lights: impl IntoIterator<Item = &'a NeonLight>,
        light_volumes: impl IntoIterator<Item = &'a LightVolume>,
        out: &mut Vec<SelectedLight>,
    ) -> SelectionStats {
        out.clear();
        let mut stats = SelectionStats::default();

        self.gather_neon(frustum, camera, neon_lights, &mut stats);
        self.gather_volumes(frustum, camera, light_volumes, &mut stats);
        stats.neon_candidates = self.neon_candidates.len();
        stats.volume_candidates = self.volume_candidates.len();

        self.neon_candidates.sort_by_key(Candidate::priority);
        self.volume_candidates.sort_by_key(Candidate::priority);

        let budget = self.budget();
        self.emit_neon(budget, out, &mut stats);
        self.emit_volumes(budget, out, &mut stats);

        if stats.truncated {
            tracing::debug!(
                "Light budget {budget} exhausted: {} neon + {} volume candidates",
                stats.neon_candidates,
                stats.volume_candidates
            );
        }
        stats
    }

    fn gather_neon<'a>(
        &mut self,
        frustum: &Frustum,
        camera: Vec3,
        lights: impl IntoIterator<Item = &'a NeonLight>,
        stats: &mut SelectionStats,
    ) {
        self.neon_candidates.clear();
        let max_distance_sq = self.config.max_light_distance * self.config.max_light_distance;
        let keep_sq = self.config.near_camera_always_keep * self.config.near_camera_always_keep;

        for light in lights {
            let distance_sq = light.position.distance_squared(camera);
            if !distance_sq.is_finite()
                || !light.radius.is_finite()
                || !light.intensity.is_finite()
            {
                stats.discarded_non_finite += 1;
                continue;
            }
            if distance_sq > max_distance_sq {
                continue;
            }

            let influence = self.neon_radius(light) * self.config.neon_influence_multiplier;
            let visible =
                frustum.intersects_sphere(light.position, influence + self.config.frustum_margin);
            if !visible && distance_sq > keep_sq {
                continue;
            }

            stats.visible_candidates += usize::from(visible);
            self.neon_candidates.push(Candidate {
                light: *light,
                distance_sq,
                visible,
            });
        }
    }

    fn gather_volumes<'a>(
        &mut self,
        frustum: &Frustum,
        camera: Vec3,
        volumes: impl IntoIterator<Item = &'a LightVolume>,
        stats: &mut SelectionStats,
    ) {
        self.volume_candidates.clear();
        let max_distance_sq = self.config.max_light_distance * self.config.max_light_distance;
        let keep_sq = self.config.near_camera_always_keep * self.config.near_camera_always_keep;

        for volume in volumes {
            let distance_sq = volume.base_position.distance_squared(camera);
            if !distance_sq.is_finite()
                || !volume.height.is_finite()
                || !volume.base_radius.is_finite()
                || !volume.intensity.is_finite()
            {
                stats.discarded_non_finite += 1;
                continue;
            }
            if distance_sq > max_distance_sq {
                continue;
            }

            let radius = volume.base_radius * self.radius_scale;
            let influence =
                radius.max(volume.height * 0.5) * self.config.volume_influence_multiplier;
            let visible =
                frustum.intersects_sphere(volume.center(), influence + self.config.frustum_margin);
            if !visible && distance_sq > keep_sq {
                continue;
            }

            stats.visible_candidates += usize::from(visible);
            self.volume_candidates.push(Candidate {
                light: *volume,
                distance_sq,
                visible,
            });
        }
    }

    fn emit_neon(&self, budget: usize, out: &mut Vec<SelectedLight>, stats: &mut SelectionStats) {
        for candidate in &self.neon_candidates {
            if out.len() >= budget {
                stats.truncated = true;
                return;
            }
            let light = &candidate.light;
            out.push(SelectedLight {
                color: light.color,
                intensity: light.intensity
                    * self.config.neon_intensity_multiplier
                    * self.intensity_scale,
                position: light.position,
                shape: LightShape::Sphere {
                    radius: self.neon_radius(light),
                },
            });
            stats.neon_records += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn emit_volumes(
        &self,
        budget: usize,
        out: &mut Vec<SelectedLight>,
        stats: &mut SelectionStats,
    ) {
        let samples = self.config.cone_samples.max(2);
        let last = (samples - 1) as f32;

        'candidates: for candidate in &self.volume_candidates {
            let volume = &candidate.light;
            if !volume.is_cone {
                if out.len() >= budget {
                    stats.truncated = true;
                    break;
                }
                out.push(SelectedLight {
                    color: volume.color,
                    intensity: volume.intensity * self.intensity_scale,
                    position: volume.center(),
                    shape: LightShape::Box {
                        half_size: volume.base_radius * self.radius_scale,
                    },
                });
                stats.volume_records += 1;
                continue;
            }

            for i in 0..samples {
                if out.len() >= budget {
                    stats.truncated = true;
                    break 'candidates;
                }
                let t = i as f32 / last;
                out.push(SelectedLight {
                    color: volume.color,
                    intensity: volume.intensity
                        * (1.0 - t * CONE_INTENSITY_FALLOFF)
                        * self.intensity_scale,
                    position: volume.base_position + Vec3::new(0.0, volume.height * t, 0.0),
                    shape: LightShape::Sphere {
                        radius: volume.base_radius
                            * (1.0 + t * CONE_RADIUS_GROWTH)
                            * self.radius_scale,
                    },
                });
                stats.volume_records += 1;
            }
        }
    }

    #[inline]
    fn neon_radius(&self, light: &NeonLight) -> f32 {
        light.radius * self.config.neon_radius_multiplier * self.radius_scale
    }
}

impl Default for LightSelector {
    fn default() -> Self {
        Self::new(VolumetricConfig::default())
    }
}

fn clamp_scale(value: f32, (min, max): (f32, f32)) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        1.0
    }
}

fn step_scale(value: f32, up: bool, range: (f32, f32)) -> f32 {
    let factor = if up { SCALE_STEP_UP } else { SCALE_STEP_DOWN };
    clamp_scale(value * factor, range)
}
