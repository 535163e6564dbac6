//! Culling primitives for per-frame light selection.
//!
//! Implements the view frustum and the bounding volumes tested against it.

mod frustum;

pub use frustum::{Aabb, Frustum, Plane};
