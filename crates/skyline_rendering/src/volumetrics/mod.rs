//! Volumetric lighting data for the froxel pass.
//!
//! Everything here runs on the CPU once per frame and ends in two
//! fixed-size byte buffers.

mod froxel;
mod frame;
/// Light selection under the record budget.
pub mod light_selection;
mod records;

pub use frame::{FrameStats, VolumetricFrame};
pub use froxel::{BinningStats, FroxelBinner};
pub use light_selection::{LightSelector, SelectionStats};
pub use records::{
    DensityBuffer, DensityRecord, GpuDensityRecord, GpuLightRecord, LightBuffer, LightShape,
    SelectedLight,
};
