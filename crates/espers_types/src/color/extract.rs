//! Frequency-based palette extraction.

use std::collections::HashMap;

use image::RgbaImage;
use log::debug;

use crate::file::spr::{Color5, Palette, codec::ALPHA_THRESHOLD};

/// Images up to this many pixels are sampled in full.
pub const FULL_SAMPLE_LIMIT: usize = 100_000;

/// Images up to this many pixels sample every second pixel; larger ones every fourth.
pub const HALF_SAMPLE_LIMIT: usize = 1_000_000;

/// Sampling stride for an image of `pixel_count` pixels.
pub fn sample_step(pixel_count: usize) -> usize {
	if pixel_count <= FULL_SAMPLE_LIMIT {
		1
	} else if pixel_count <= HALF_SAMPLE_LIMIT {
		2
	} else {
		4
	}
}

/// Distinct opaque RGBA colors, most frequent first.
///
/// Equal counts keep the order in which the colors were first sampled, so the
/// result is deterministic for a given image.
pub fn color_histogram(image: &RgbaImage) -> Vec<([u8; 4], usize)> {
	let pixel_count = image.width() as usize * image.height() as usize;
	let step = sample_step(pixel_count);

	// rgba -> (count, first seen)
	let mut counts: HashMap<[u8; 4], (usize, usize)> = HashMap::new();
	for px in image.pixels().step_by(step) {
		if px[3] < ALPHA_THRESHOLD {
			continue;
		}
		let next = counts.len();
		counts.entry(px.0).or_insert((0, next)).0 += 1;
	}

	let mut entries: Vec<_> = counts.into_iter().collect();
	entries.sort_by(|(_, (count_a, seen_a)), (_, (count_b, seen_b))| {
		count_b.cmp(count_a).then(seen_a.cmp(seen_b))
	});
	debug!("Histogram: {} distinct colors, sample step {step}", entries.len());
	entries.into_iter().map(|(rgba, (count, _))| (rgba, count)).collect()
}

/// Extracts a palette from the most frequent opaque colors.
///
/// The top `min(max_colors, 16)` colors fill slots from 0 upward; unused slots
/// are black.
pub fn extract(image: &RgbaImage, max_colors: usize) -> Palette {
	fill_from(image, 0, max_colors.min(Palette::SIZE))
}

/// Extracts a palette for sprite encoding: slot 0 is left as the transparent
/// slot and the top `min(max_colors, 15)` colors fill slots 1-15.
pub fn extract_sprite_palette(image: &RgbaImage, max_colors: usize) -> Palette {
	fill_from(image, 1, max_colors.min(Palette::SIZE - 1))
}

fn fill_from(image: &RgbaImage, first_slot: usize, count: usize) -> Palette {
	let mut palette = Palette::new();
	for (slot, (rgba, _)) in (first_slot..).zip(color_histogram(image).into_iter().take(count)) {
		palette[slot] = Color5::from_rgb8(rgba[0], rgba[1], rgba[2]);
	}
	palette
}
