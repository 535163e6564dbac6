//! Benchmark for chunk generation and streaming.
//!
//! Run with: cargo bench --package skyline_procedural --bench chunk_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use skyline_core::{CityConfig, StreamingConfig};
use skyline_procedural::{ChunkKey, ChunkStreamer, CityGenerator};

fn benchmark_single_chunk(c: &mut Criterion) {
    let mut generator = CityGenerator::new(CityConfig::default());

    c.bench_function("single_chunk_content", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            black_box(generator.generate_chunk_content(ChunkKey::new(coord, coord / 2), 42))
        });
    });
}

fn benchmark_chunk_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_grid");

    group.throughput(Throughput::Elements(16 * 16));
    group.bench_function("16x16_chunks", |b| {
        b.iter(|| {
            let mut generator = CityGenerator::new(CityConfig::default());
            for z in 0..16 {
                for x in 0..16 {
                    generator.generate_chunk(x, z, 42);
                }
            }
            black_box(generator.building_count())
        });
    });

    group.finish();
}

fn benchmark_streaming_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming");
    group.sample_size(10);

    group.bench_function("walk_2000_units", |b| {
        b.iter(|| {
            let mut generator = CityGenerator::new(CityConfig::default());
            let mut streamer = ChunkStreamer::new(StreamingConfig::default());
            let mut x = 0.0f32;
            while x < 2_000.0 {
                streamer.update(&mut generator, x, 0.0);
                x += 5.0;
            }
            black_box(streamer.stats())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_chunk,
    benchmark_chunk_grid,
    benchmark_streaming_walk
);
criterion_main!(benches);
