//! # SKYLINE Rendering
//!
//! CPU-side preparation of the volumetric lighting inputs:
//! - Frustum planes from the view-projection matrix
//! - Budgeted light selection (visible first, then nearest)
//! - Froxel binning of buildings and light volumes
//! - Zero-filled, fixed-capacity upload buffers
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    PER-FRAME PIPELINE                     │
//! ├───────────────────────────────────────────────────────────┤
//! │  View-Projection → Frustum                                │
//! │        ↓                                                  │
//! │  Neon + Volumes → LightSelector → LightBuffer (1024×32B)  │
//! │  Buildings + Volumes → FroxelBinner → DensityBuffer       │
//! │                                        (2048×48B)         │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use glam::{Mat4, Vec3};
//! use skyline_procedural::CityGenerator;
//! use skyline_rendering::{Frustum, VolumetricFrame};
//!
//! let mut world = CityGenerator::default();
//! world.generate_chunk(0, 0, 42);
//!
//! let camera = Vec3::new(0.0, 20.0, 60.0);
//! let view = Mat4::look_at_rh(camera, Vec3::ZERO, Vec3::Y);
//! let projection = Mat4::perspective_rh(1.0, 16.0 / 9.0, 0.1, 1000.0);
//! let frustum = Frustum::from_view_projection(&(projection * view));
//!
//! let mut frame = VolumetricFrame::default();
//! let stats = frame.update(&frustum, camera, &world);
//! assert_eq!(stats.light_count, frame.light_buffer().count());
//! assert_eq!(frame.light_buffer().as_bytes().len(), 1024 * 32);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod culling;
pub mod volumetrics;

pub use culling::{Aabb, Frustum, Plane};
pub use volumetrics::{
    BinningStats, DensityBuffer, DensityRecord, FrameStats, FroxelBinner, GpuDensityRecord,
    GpuLightRecord, LightBuffer, LightSelector, LightShape, SelectedLight, SelectionStats,
    VolumetricFrame,
};
