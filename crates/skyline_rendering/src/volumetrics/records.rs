//! Selected lights, density records and their GPU wire formats.
//!
//! The API works with [`SelectedLight`] and [`DensityRecord`]. Only the
//! upload buffers see the packed `Gpu*` records, where a light's shape is
//! folded into the sign of its radius.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use skyline_core::{MAX_DENSITY_RECORDS, MAX_VOLUMETRIC_LIGHTS};

/// Shape of a selected light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightShape {
    /// Point light with a falloff radius.
    Sphere {
        /// Falloff radius.
        radius: f32,
    },
    /// Box-shaped light volume.
    Box {
        /// Half the box side.
        half_size: f32,
    },
}

/// A light chosen for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedLight {
    /// Light color.
    pub color: Vec3,
    /// Intensity after runtime scaling.
    pub intensity: f32,
    /// World position.
    pub position: Vec3,
    /// Sphere or box.
    pub shape: LightShape,
}

impl SelectedLight {
    /// Packs the light into its wire format.
    #[inline]
    #[must_use]
    pub fn to_gpu(&self) -> GpuLightRecord {
        let signed_radius = match self.shape {
            LightShape::Sphere { radius } => radius,
            LightShape::Box { half_size } => -half_size,
        };
        GpuLightRecord {
            color_intensity: [self.color.x, self.color.y, self.color.z, self.intensity],
            position_radius: [self.position.x, self.position.y, self.position.z, signed_radius],
        }
    }
}

/// A froxel-space box of extra fog density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityRecord {
    /// First covered cell per axis.
    pub min: [u32; 3],
    /// One past the last covered cell per axis.
    pub max: [u32; 3],
    /// Extinction boost.
    pub sigma: f32,
    /// Scattering color.
    pub albedo: Vec3,
}

impl DensityRecord {
    /// Packs the record into its wire format.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_gpu(&self) -> GpuDensityRecord {
        let [min_x, min_y, min_z] = self.min.map(|v| v as f32);
        let [max_x, max_y, max_z] = self.max.map(|v| v as f32);
        GpuDensityRecord {
            min_bounds_sigma: [min_x, min_y, min_z, self.sigma],
            max_bounds: [max_x, max_y, max_z, 0.0],
            albedo: [self.albedo.x, self.albedo.y, self.albedo.z, 0.0],
        }
    }
}

/// Wire format of a light: `(color.rgb, intensity)`, `(position.xyz, radius)`.
///
/// A negative radius means a box of half-size `|radius|`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GpuLightRecord {
    /// Color and intensity.
    pub color_intensity: [f32; 4],
    /// Position and signed radius.
    pub position_radius: [f32; 4],
}

impl GpuLightRecord {
    /// Returns true if the record describes a box light.
    #[inline]
    #[must_use]
    pub fn is_box(&self) -> bool {
        self.position_radius[3] < 0.0
    }
}

/// Wire format of a density record: `(min.xyz, sigma)`, `(max.xyz, 0)`,
/// `(albedo.rgb, 0)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GpuDensityRecord {
    /// Minimum cell bounds and sigma boost.
    pub min_bounds_sigma: [f32; 4],
    /// Maximum cell bounds.
    pub max_bounds: [f32; 4],
    /// Albedo color.
    pub albedo: [f32; 4],
}

/// Fixed-capacity light buffer ready for verbatim upload.
///
/// Slots past `count` are always zero.
pub struct LightBuffer {
    records: Box<[GpuLightRecord]>,
    count: usize,
}

impl LightBuffer {
    /// Creates a zeroed buffer of [`MAX_VOLUMETRIC_LIGHTS`] records.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: vec![GpuLightRecord::zeroed(); MAX_VOLUMETRIC_LIGHTS].into_boxed_slice(),
            count: 0,
        }
    }

    /// Packs `lights` and zero-fills the rest. Lights beyond capacity are
    /// dropped. Returns the stored count.
    pub fn upload(&mut self, lights: &[SelectedLight]) -> usize {
        let count = lights.len().min(self.records.len());
        for (slot, light) in self.records.iter_mut().zip(&lights[..count]) {
            *slot = light.to_gpu();
        }
        self.records[count..].fill(GpuLightRecord::zeroed());
        self.count = count;
        count
    }

    /// Returns the number of valid records.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns every record, including zeroed slots.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[GpuLightRecord] {
        &self.records
    }

    /// Returns the full buffer as bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }
}

impl Default for LightBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-capacity density buffer ready for verbatim upload.
///
/// Slots past `count` are always zero.
pub struct DensityBuffer {
    records: Box<[GpuDensityRecord]>,
    count: usize,
}

impl DensityBuffer {
    /// Creates a zeroed buffer of [`MAX_DENSITY_RECORDS`] records.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: vec![GpuDensityRecord::zeroed(); MAX_DENSITY_RECORDS].into_boxed_slice(),
            count: 0,
        }
    }

    /// Packs `densities` and zero-fills the rest. Returns the stored count.
    pub fn upload(&mut self, densities: &[DensityRecord]) -> usize {
        let count = densities.len().min(self.records.len());
        for (slot, record) in self.records.iter_mut().zip(&densities[..count]) {
            *slot = record.to_gpu();
        }
        self.records[count..].fill(GpuDensityRecord::zeroed());
        self.count = count;
        count
    }

    /// Returns the number of valid records.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns every record, including zeroed slots.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[GpuDensityRecord] {
        &self.records
    }

    /// Returns the full buffer as bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }
}

impl Default for DensityBuffer {
    fn default() -> Self {
        Self::new()
    }
}
