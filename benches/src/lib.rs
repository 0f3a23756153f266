//! Benchmark helper utilities for espers-rs
//!
//! This module generates synthetic workloads for the sprite pipeline
//! benchmarks. Nothing here needs a real cartridge image.

use image::{Rgba, RgbaImage};

/// Generates tile data that compresses like real sprite graphics: short
/// runs of repeated bytes broken up by a slowly drifting pattern.
pub fn generate_tile_data(len: usize) -> Vec<u8> {
	let mut data = Vec::with_capacity(len);
	let mut seed = 0x2545_F491u32;
	while data.len() < len {
		// xorshift keeps the output deterministic across runs
		seed ^= seed << 13;
		seed ^= seed >> 17;
		seed ^= seed << 5;
		let value = (seed & 0xFF) as u8;
		let run = 1 + (seed >> 28) as usize;
		for _ in 0..run.min(len - data.len()) {
			data.push(value & 0x77);
		}
	}
	data
}

/// Generates a diagonal gradient with a transparent border, the kind of
/// image a user would import.
pub fn generate_gradient_image(width: u32, height: u32) -> RgbaImage {
	RgbaImage::from_fn(width, height, |x, y| {
		if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
			return Rgba([0, 0, 0, 0]);
		}
		let r = (x * 255 / width.max(1)) as u8;
		let g = (y * 255 / height.max(1)) as u8;
		let b = ((x + y) * 127 / (width + height).max(1)) as u8;
		Rgba([r, g, b, 255])
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_tile_data_len() {
		assert_eq!(generate_tile_data(1536).len(), 1536);
		assert_eq!(generate_tile_data(1536), generate_tile_data(1536));
	}

	#[test]
	fn test_gradient_border_transparent() {
		let image = generate_gradient_image(16, 24);
		assert_eq!(image.get_pixel(0, 5)[3], 0);
		assert_eq!(image.get_pixel(5, 5)[3], 255);
	}
}
