//! # City Generator
//!
//! Owns the generated world: pools of buildings, neon lights and light
//! volumes, plus the registry of which chunk owns which handles.
//!
//! ## Determinism Guarantee
//!
//! A chunk's content depends only on `(chunk_x, chunk_z, base_seed)` and the
//! [`CityConfig`]. Generation order, removed chunks and other resident
//! chunks have no influence.

use std::collections::HashMap;

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use skyline_core::{CityConfig, Handle, Pool};

use crate::building::{add_ground_lights, generate_building};
use crate::chunk::{ChunkKey, ChunkRecord};
use crate::city::{Building, CityContent, LightVolume, NeonLight};
use crate::seed::{chunk_seed, rng_from_seed};

/// Chunked procedural city generator.
///
/// # Example
///
/// ```rust
/// use skyline_core::CityConfig;
/// use skyline_procedural::CityGenerator;
///
/// let mut generator = CityGenerator::new(CityConfig::default());
/// assert!(generator.generate_chunk(0, 0, 42));
/// assert!(!generator.generate_chunk(0, 0, 42));
/// assert!(generator.remove_chunk(0, 0));
/// assert_eq!(generator.building_count(), 0);
/// ```
pub struct CityGenerator {
    config: CityConfig,
    rng: ChaCha8Rng,
    buildings: Pool<Building>,
    neon_lights: Pool<NeonLight>,
    light_volumes: Pool<LightVolume>,
    chunks: HashMap<ChunkKey, ChunkRecord>,
}

impl CityGenerator {
    /// Creates an empty generator.
    #[must_use]
    pub fn new(config: CityConfig) -> Self {
        Self {
            config,
            rng: rng_from_seed(0),
            buildings: Pool::new(),
            neon_lights: Pool::new(),
            light_volumes: Pool::new(),
            chunks: HashMap::new(),
        }
    }

    /// Returns the generation parameters.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    /// Generates a chunk if it is not registered yet.
    ///
    /// Returns true when new content was generated.
    pub fn generate_chunk(&mut self, chunk_x: i32, chunk_z: i32, base_seed: i32) -> bool {
        let key = ChunkKey::new(chunk_x, chunk_z);
        if self.chunks.contains_key(&key) {
            return false;
        }

        let content = self.generate_chunk_content(key, base_seed);
        tracing::trace!(
            "Chunk ({}, {}): {} buildings, {} neon lights, {} light volumes",
            chunk_x,
            chunk_z,
            content.buildings.len(),
            content.neon_lights.len(),
            content.light_volumes.len()
        );

        let record = self.store(content);
        self.chunks.insert(key, record);
        true
    }

    /// Generates the content of a chunk without registering it.
    ///
    /// Reseeds the generator's stream; the result is what
    /// [`CityGenerator::generate_chunk`] would store for `key`.
    #[must_use]
    pub fn generate_chunk_content(&mut self, key: ChunkKey, base_seed: i32) -> CityContent {
        self.rng = rng_from_seed(chunk_seed(base_seed, key.x, key.z));

        let config = &self.config;
        let rng = &mut self.rng;
        let cells = config.buildings_per_chunk;
        let spacing = config.grid_spacing;

        let [origin_x, origin_z] = key.origin(config.chunk_size);
        let [offset_x, offset_z] = config.city_center_offset();
        #[allow(clippy::cast_precision_loss)]
        let margin = (config.chunk_size - cells as f32 * spacing) * 0.5;

        let mut content = CityContent::default();
        for x in 0..cells {
            for z in 0..cells {
                if rng.gen::<f32>() > config.building_density {
                    continue;
                }

                let jitter_x = (rng.gen::<f32>() - 0.5) * 0.8 * spacing;
                let jitter_z = (rng.gen::<f32>() - 0.5) * 0.8 * spacing;

                #[allow(clippy::cast_precision_loss)]
                let local = Vec2::new(
                    margin + (x as f32 + 0.5) * spacing,
                    margin + (z as f32 + 0.5) * spacing,
                );
                let position = Vec2::new(
                    origin_x + local.x + jitter_x + offset_x,
                    origin_z + local.y + jitter_z + offset_z,
                );
                generate_building(rng, config, position, &mut content);
            }
        }

        add_ground_lights(rng, config, &content.buildings, &mut content.light_volumes);
        content
    }

    /// Removes a chunk and frees everything it owns.
    ///
    /// Handles owned by other chunks stay valid. Returns false if the chunk
    /// was not registered.
    pub fn remove_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> bool {
        let Some(record) = self.chunks.remove(&ChunkKey::new(chunk_x, chunk_z)) else {
            return false;
        };

        for handle in record.buildings {
            self.buildings.remove(handle);
        }
        for handle in record.neon_lights {
            self.neon_lights.remove(handle);
        }
        for handle in record.light_volumes {
            self.light_volumes.remove(handle);
        }
        true
    }

    /// Removes every chunk and all generated content.
    pub fn clear_all_chunks(&mut self) {
        self.buildings.clear();
        self.neon_lights.clear();
        self.light_volumes.clear();
        self.chunks.clear();
    }

    /// Replaces everything with a fixed `grid_size × grid_size` city.
    ///
    /// The stream is seeded once. The content belongs to no chunk, so it is
    /// only released by [`CityGenerator::clear_all_chunks`] or the next call.
    #[allow(clippy::cast_sign_loss)]
    pub fn generate_city(&mut self, seed: i32) {
        self.clear_all_chunks();
        self.rng = rng_from_seed(seed as u32);

        let config = &self.config;
        let rng = &mut self.rng;
        let [offset_x, offset_z] = config.city_center_offset();

        let mut content = CityContent::default();
        for x in 0..config.grid_size {
            for z in 0..config.grid_size {
                if rng.gen::<f32>() > config.building_density {
                    continue;
                }
                #[allow(clippy::cast_precision_loss)]
                let position = Vec2::new(
                    x as f32 * config.grid_spacing + offset_x,
                    z as f32 * config.grid_spacing + offset_z,
                );
                generate_building(rng, config, position, &mut content);
            }
        }

        tracing::info!(
            "Generated city: {} buildings, {} neon lights, {} light volumes",
            content.buildings.len(),
            content.neon_lights.len(),
            content.light_volumes.len()
        );
        let _ = self.store(content);
    }

    fn store(&mut self, content: CityContent) -> ChunkRecord {
        ChunkRecord {
            buildings: content
                .buildings
                .into_iter()
                .map(|b| self.buildings.insert(b))
                .collect(),
            neon_lights: content
                .neon_lights
                .into_iter()
                .map(|l| self.neon_lights.insert(l))
                .collect(),
            light_volumes: content
                .light_volumes
                .into_iter()
                .map(|v| self.light_volumes.insert(v))
                .collect(),
        }
    }

    /// Returns the chunk containing a world position.
    #[inline]
    #[must_use]
    pub fn world_to_chunk(&self, world_x: f32, world_z: f32) -> ChunkKey {
        ChunkKey::from_world_pos(
            world_x,
            world_z,
            self.config.chunk_size,
            self.config.city_center_offset(),
        )
    }

    /// Returns the record of a registered chunk.
    #[inline]
    #[must_use]
    pub fn chunk(&self, key: ChunkKey) -> Option<&ChunkRecord> {
        self.chunks.get(&key)
    }

    /// Returns true if the chunk is registered.
    #[inline]
    #[must_use]
    pub fn has_chunk(&self, key: ChunkKey) -> bool {
        self.chunks.contains_key(&key)
    }

    /// Iterates over registered chunk keys in arbitrary order.
    pub fn chunk_keys(&self) -> impl Iterator<Item = ChunkKey> + '_ {
        self.chunks.keys().copied()
    }

    /// Returns the number of registered chunks.
    #[inline]
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns a building by handle.
    #[inline]
    #[must_use]
    pub fn building(&self, handle: Handle<Building>) -> Option<&Building> {
        self.buildings.get(handle)
    }

    /// Returns a neon light by handle.
    #[inline]
    #[must_use]
    pub fn neon_light(&self, handle: Handle<NeonLight>) -> Option<&NeonLight> {
        self.neon_lights.get(handle)
    }

    /// Returns a light volume by handle.
    #[inline]
    #[must_use]
    pub fn light_volume(&self, handle: Handle<LightVolume>) -> Option<&LightVolume> {
        self.light_volumes.get(handle)
    }

    /// Iterates over every resident building.
    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values()
    }

    /// Iterates over every resident neon light.
    pub fn neon_lights(&self) -> impl Iterator<Item = &NeonLight> {
        self.neon_lights.values()
    }

    /// Iterates over every resident light volume.
    pub fn light_volumes(&self) -> impl Iterator<Item = &LightVolume> {
        self.light_volumes.values()
    }

    /// Returns the number of resident buildings.
    #[inline]
    #[must_use]
    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    /// Returns the number of resident neon lights.
    #[inline]
    #[must_use]
    pub fn neon_light_count(&self) -> usize {
        self.neon_lights.len()
    }

    /// Returns the number of resident light volumes.
    #[inline]
    #[must_use]
    pub fn light_volume_count(&self) -> usize {
        self.light_volumes.len()
    }
}

impl Default for CityGenerator {
    fn default() -> Self {
        Self::new(CityConfig::default())
    }
}

impl std::fmt::Debug for CityGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CityGenerator")
            .field("chunks", &self.chunks.len())
            .field("buildings", &self.buildings.len())
            .field("neon_lights", &self.neon_lights.len())
            .field("light_volumes", &self.light_volumes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_idempotent() {
        let mut generator = CityGenerator::default();
        assert!(generator.generate_chunk(2, -1, 42));
        let buildings = generator.building_count();
        let lights = generator.neon_light_count();

        assert!(!generator.generate_chunk(2, -1, 42));
        assert_eq!(generator.chunk_count(), 1);
        assert_eq!(generator.building_count(), buildings);
        assert_eq!(generator.neon_light_count(), lights);
    }

    #[test]
    fn test_chunk_record_matches_pools() {
        let mut generator = CityGenerator::default();
        generator.generate_chunk(0, 0, 42);
        let record = generator.chunk(ChunkKey::new(0, 0)).unwrap();

        assert_eq!(record.buildings.len(), generator.building_count());
        assert_eq!(record.neon_lights.len(), generator.neon_light_count());
        assert_eq!(record.light_volumes.len(), generator.light_volume_count());
        for handle in &record.buildings {
            assert!(generator.building(*handle).is_some());
        }
    }

    #[test]
    fn test_buildings_stay_inside_their_chunk() {
        let mut generator = CityGenerator::default();
        generator.generate_chunk(-3, 4, 42);
        let key = ChunkKey::new(-3, 4);

        assert!(generator.building_count() > 0);
        for building in generator.buildings() {
            assert_eq!(generator.world_to_chunk(building.position.x, building.position.z), key);
        }
    }

    #[test]
    fn test_remove_unknown_chunk() {
        let mut generator = CityGenerator::default();
        assert!(!generator.remove_chunk(9, 9));
    }

    #[test]
    fn test_generate_city_grid() {
        let mut generator = CityGenerator::new(CityConfig {
            grid_size: 10,
            ..CityConfig::default()
        });
        generator.generate_chunk(0, 0, 42);
        generator.generate_city(7);

        assert_eq!(generator.chunk_count(), 0);
        assert!(generator.building_count() > 0);
        assert!(generator.building_count() <= 100);

        let first: Vec<_> = generator.buildings().cloned().collect();
        generator.generate_city(7);
        let second: Vec<_> = generator.buildings().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_density_fills_grid() {
        let config = CityConfig {
            building_density: 1.0,
            ..CityConfig::default()
        };
        let cells = (config.buildings_per_chunk * config.buildings_per_chunk) as usize;
        let mut generator = CityGenerator::new(config);
        generator.generate_chunk(1, 1, 42);
        assert_eq!(generator.building_count(), cells);
    }
}
