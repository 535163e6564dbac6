//! # Chunk Determinism Integration Test
//!
//! Proves chunk content depends only on its coordinate and base seed, and
//! that chunks can be removed in any order without disturbing the others.

use skyline_core::CityConfig;
use skyline_procedural::{chunk_seed, Building, ChunkKey, CityGenerator, NeonLight};

fn snapshot(generator: &CityGenerator, key: ChunkKey) -> (Vec<Building>, Vec<NeonLight>) {
    let record = generator.chunk(key).expect("chunk registered");
    let buildings = record
        .buildings
        .iter()
        .map(|h| generator.building(*h).expect("live building").clone())
        .collect();
    let lights = record
        .neon_lights
        .iter()
        .map(|h| *generator.neon_light(*h).expect("live light"))
        .collect();
    (buildings, lights)
}

/// Test: Two independent generators agree bit for bit.
#[test]
fn test_independent_runs_identical() {
    for (x, z) in [(0, 0), (3, -5), (-17, 42), (1000, -1000)] {
        let mut a = CityGenerator::default();
        let mut b = CityGenerator::default();
        a.generate_chunk(x, z, 42);
        b.generate_chunk(x, z, 42);

        let key = ChunkKey::new(x, z);
        assert_eq!(snapshot(&a, key), snapshot(&b, key), "chunk ({x}, {z})");
    }
}

/// Test: Generation order does not matter.
#[test]
fn test_order_independent() {
    let keys = [(0, 0), (1, 0), (0, 1), (-1, -1)];

    let mut forward = CityGenerator::default();
    for (x, z) in keys {
        forward.generate_chunk(x, z, 7);
    }

    let mut backward = CityGenerator::default();
    for (x, z) in keys.iter().rev() {
        backward.generate_chunk(*x, *z, 7);
    }

    for (x, z) in keys {
        let key = ChunkKey::new(x, z);
        assert_eq!(snapshot(&forward, key), snapshot(&backward, key));
    }
}

/// Test: The reference seed value.
#[test]
fn test_reference_seed() {
    let expected = (42i32.wrapping_mul(73_856_093)
        ^ 3i32.wrapping_mul(19_349_663)
        ^ (-5i32).wrapping_mul(83_492_791)) as u32;
    assert_eq!(chunk_seed(42, 3, -5), expected);
    assert_eq!(expected, 1_552_930_802);
}

/// Test: Two neighbouring chunks own disjoint handle sets whose sizes add up.
#[test]
fn test_two_chunk_scenario() {
    let mut solo_a = CityGenerator::default();
    solo_a.generate_chunk(0, 0, 42);
    let mut solo_b = CityGenerator::default();
    solo_b.generate_chunk(1, 0, 42);

    let mut generator = CityGenerator::default();
    generator.generate_chunk(0, 0, 42);
    generator.generate_chunk(1, 0, 42);

    let a = generator.chunk(ChunkKey::new(0, 0)).unwrap();
    let b = generator.chunk(ChunkKey::new(1, 0)).unwrap();
    assert!(a.buildings.iter().all(|h| !b.buildings.contains(h)));
    assert!(a.neon_lights.iter().all(|h| !b.neon_lights.contains(h)));

    assert_eq!(
        generator.building_count(),
        solo_a.building_count() + solo_b.building_count()
    );
    assert_eq!(
        generator.neon_light_count(),
        solo_a.neon_light_count() + solo_b.neon_light_count()
    );
}

/// Test: Removing one chunk keeps every other chunk's handles resolvable.
#[test]
fn test_remove_middle_chunk() {
    let mut generator = CityGenerator::default();
    for x in 0..3 {
        generator.generate_chunk(x, 0, 42);
    }
    let first = snapshot(&generator, ChunkKey::new(0, 0));
    let last = snapshot(&generator, ChunkKey::new(2, 0));

    assert!(generator.remove_chunk(1, 0));
    assert!(!generator.has_chunk(ChunkKey::new(1, 0)));
    assert_eq!(snapshot(&generator, ChunkKey::new(0, 0)), first);
    assert_eq!(snapshot(&generator, ChunkKey::new(2, 0)), last);

    // New content reuses the freed slots without aliasing old handles
    generator.generate_chunk(5, 5, 42);
    assert_eq!(snapshot(&generator, ChunkKey::new(0, 0)), first);
    assert_eq!(snapshot(&generator, ChunkKey::new(2, 0)), last);
}

/// Test: A removed chunk regenerates identically.
#[test]
fn test_regenerate_after_remove() {
    let mut generator = CityGenerator::default();
    generator.generate_chunk(4, -2, 42);
    let before = snapshot(&generator, ChunkKey::new(4, -2));

    generator.generate_chunk(5, -2, 42);
    generator.remove_chunk(4, -2);
    assert!(generator.generate_chunk(4, -2, 42));
    assert_eq!(snapshot(&generator, ChunkKey::new(4, -2)), before);
}

/// Test: Every branch pair is mirrored across its parent.
#[test]
fn test_branch_symmetry() {
    let mut generator = CityGenerator::default();
    for x in -2..2 {
        for z in -2..2 {
            generator.generate_chunk(x, z, 42);
        }
    }

    let mut pairs = 0;
    for building in generator.buildings() {
        for (i, j) in building.branch_pairs() {
            let (p1, p2) = (building.parts[i], building.parts[j]);
            let parent = building.parts[p1.parent.expect("branch has parent")];
            assert_eq!(p1.parent, p2.parent);
            assert_eq!(p1.size, p2.size);
            assert_eq!(p1.color, p2.color);
            assert_eq!(p1.detail_level, p2.detail_level);

            let tolerance = 1e-3 * (1.0 + parent.position.abs().max_element());
            assert!((p1.position.x + p2.position.x - 2.0 * parent.position.x).abs() < tolerance);
            assert!((p1.position.z + p2.position.z - 2.0 * parent.position.z).abs() < tolerance);
            assert_eq!(p1.position.y, p2.position.y);
            pairs += 1;
        }
    }
    assert!(pairs > 0, "expected some branches");
    println!("Checked {pairs} branch pairs");
}

/// Test: Heights stay in the configured range for many chunks.
#[test]
fn test_height_bounds() {
    let config = CityConfig::default();
    let mut generator = CityGenerator::new(config.clone());
    for x in 0..8 {
        for z in 0..8 {
            generator.generate_chunk(x, z, 1234);
        }
    }
    for building in generator.buildings() {
        assert!(building.height() >= config.min_height);
        assert!(building.height() <= config.max_height);
    }
}

/// Test: Different base seeds give different cities.
#[test]
fn test_base_seed_changes_content() {
    let mut a = CityGenerator::default();
    let mut b = CityGenerator::default();
    a.generate_chunk(0, 0, 42);
    b.generate_chunk(0, 0, 43);
    assert_ne!(
        snapshot(&a, ChunkKey::new(0, 0)),
        snapshot(&b, ChunkKey::new(0, 0))
    );
}
