//! # Chunk Registry Types
//!
//! The world is a grid of square chunks. A chunk owns the handles of every
//! building, neon light and light volume generated for it, so it can be
//! removed without touching the content of any other chunk.

use skyline_core::Handle;

use crate::city::{Building, LightVolume, NeonLight};

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    /// X coordinate (in chunks, not world units).
    pub x: i32,
    /// Z coordinate (in chunks, not world units).
    pub z: i32,
}

impl ChunkKey {
    /// Creates a new chunk key.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the chunk containing a world position.
    ///
    /// `offset` is the city-center offset every generated position carries.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_world_pos(world_x: f32, world_z: f32, chunk_size: f32, offset: [f32; 2]) -> Self {
        Self {
            x: ((world_x - offset[0]) / chunk_size).floor() as i32,
            z: ((world_z - offset[1]) / chunk_size).floor() as i32,
        }
    }

    /// Returns the world position of the chunk's origin corner, without the
    /// city-center offset.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn origin(self, chunk_size: f32) -> [f32; 2] {
        [self.x as f32 * chunk_size, self.z as f32 * chunk_size]
    }

    /// Returns the world position of the chunk's center, including the
    /// city-center offset.
    #[inline]
    #[must_use]
    pub fn center(self, chunk_size: f32, offset: [f32; 2]) -> [f32; 2] {
        let [x, z] = self.origin(chunk_size);
        [
            x + chunk_size * 0.5 + offset[0],
            z + chunk_size * 0.5 + offset[1],
        ]
    }
}

/// Everything a chunk contributed to the generator's pools.
#[derive(Debug, Clone, Default)]
pub struct ChunkRecord {
    /// Buildings owned by the chunk.
    pub buildings: Vec<Handle<Building>>,
    /// Neon lights owned by the chunk.
    pub neon_lights: Vec<Handle<NeonLight>>,
    /// Light volumes owned by the chunk.
    pub light_volumes: Vec<Handle<LightVolume>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_to_chunk_negative() {
        let key = ChunkKey::from_world_pos(-0.5, 49.9, 50.0, [0.0, 0.0]);
        assert_eq!(key, ChunkKey::new(-1, 0));
    }

    #[test]
    fn test_world_to_chunk_with_offset() {
        // Chunk 0 starts at the offset
        let key = ChunkKey::from_world_pos(-100.0, -51.0, 50.0, [-100.0, -100.0]);
        assert_eq!(key, ChunkKey::new(0, 0));
    }

    #[test]
    fn test_center_roundtrip() {
        let offset = [-100.0, -100.0];
        let key = ChunkKey::new(3, -2);
        let [cx, cz] = key.center(50.0, offset);
        assert_eq!(ChunkKey::from_world_pos(cx, cz, 50.0, offset), key);
    }
}
