//! # Memory Management
//!
//! Handle-addressed storage for streamed world content.
//!
//! Chunk records hold handles rather than raw vector indices, so dropping
//! one chunk never shifts the bookkeeping of another.

mod pool;

pub use pool::{Handle, Pool};
