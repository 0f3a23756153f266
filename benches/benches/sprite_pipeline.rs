//! Benchmark suite for the sprite pipeline
//!
//! Measures block decompression, tile decoding and import quantization.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use espers_benches::{generate_gradient_image, generate_tile_data};
use espers_types::{
	color::{self, DitherMode},
	file::{Palette, Sprite, SpriteKind, lz, spr::codec},
};
use std::hint::black_box;

/// Benchmark decompression of blocks the size of field and battle graphics
fn bench_decompress(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz_decompress");

	for size in [512usize, 1536, 16 * 1024] {
		let packed = lz::compress(&generate_tile_data(size));
		group.throughput(Throughput::Bytes(size as u64));
		group.bench_with_input(BenchmarkId::from_parameter(size), &packed, |b, packed| {
			b.iter(|| black_box(lz::decompress(black_box(packed))));
		});
	}

	group.finish();
}

/// Benchmark the greedy compressor
fn bench_compress(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz_compress");
	let data = generate_tile_data(1536);

	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_function("field_block", |b| {
		b.iter(|| black_box(lz::compress(black_box(&data))));
	});

	group.finish();
}

/// Benchmark decoding every frame of a field sprite set
fn bench_decode_frames(c: &mut Criterion) {
	let mut group = c.benchmark_group("sprite_decode");

	let data = generate_tile_data(1536);
	let sprite = match Sprite::new(SpriteKind::Character, 8, data, Palette::grayscale()) {
		Ok(sprite) => sprite,
		Err(e) => {
			eprintln!("Warning: Could not build benchmark sprite: {e}");
			return;
		}
	};

	group.throughput(Throughput::Elements(16 * 24 * 8));
	group.bench_function("field_set", |b| {
		b.iter(|| black_box(codec::decode_all(black_box(&sprite))));
	});

	group.finish();
}

/// Benchmark the import path under each dithering mode
fn bench_quantize(c: &mut Criterion) {
	let mut group = c.benchmark_group("quantize");
	let image = generate_gradient_image(64, 64);
	let palette = color::extract_sprite_palette(&image, 16);

	group.throughput(Throughput::Elements(64 * 64));
	for mode in [DitherMode::None, DitherMode::FloydSteinberg, DitherMode::Bayer] {
		group.bench_with_input(BenchmarkId::from_parameter(mode), &mode, |b, &mode| {
			b.iter(|| {
				black_box(color::import_with_palette(
					black_box(&image),
					&palette,
					SpriteKind::Enemy,
					mode,
				))
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_decompress, bench_compress, bench_decode_frames, bench_quantize);

criterion_main!(benches);
