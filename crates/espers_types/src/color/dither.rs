//! Nearest-color quantization with optional dithering.
//!
//! Every quantizer returns a new image whose opaque pixels are exact palette
//! colors. Pixels with alpha below the sprite threshold are copied through
//! untouched and take no part in error diffusion.

use image::{Rgba, RgbaImage};

use crate::file::spr::{Palette, codec::ALPHA_THRESHOLD};

use super::{DitherMode, SlotRange};

/// 4×4 ordered dither matrix, indexed `[y % 4][x % 4]`.
pub const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Additive per-channel offset for a matrix cell.
#[inline]
pub fn bayer_offset(x: u32, y: u32) -> f32 {
	let cell = f32::from(BAYER_4X4[(y % 4) as usize][(x % 4) as usize]);
	cell * (255.0 / 16.0) / 15.0
}

fn nearest(palette: &Palette, range: SlotRange, r: u8, g: u8, b: u8) -> u8 {
	match range {
		SlotRange::All => palette.nearest_index(r, g, b),
		SlotRange::Opaque => palette.nearest_opaque_index(r, g, b),
	}
}

fn to_channel(value: f32) -> u8 {
	value.round().clamp(0.0, 255.0) as u8
}

/// Quantizes `image` with the given dithering mode.
pub fn quantize(image: &RgbaImage, palette: &Palette, mode: DitherMode, range: SlotRange) -> RgbaImage {
	match mode {
		DitherMode::None => quantize_plain(image, palette, range),
		DitherMode::FloydSteinberg => quantize_error_diffusion(image, palette, range),
		DitherMode::Bayer => quantize_ordered(image, palette, range),
	}
}

/// Maps every pixel to its nearest palette color, without error feedback.
pub fn quantize_no_dither(image: &RgbaImage, palette: &Palette) -> RgbaImage {
	quantize_plain(image, palette, SlotRange::All)
}

/// Floyd–Steinberg error diffusion.
pub fn quantize_floyd_steinberg(image: &RgbaImage, palette: &Palette) -> RgbaImage {
	quantize_error_diffusion(image, palette, SlotRange::All)
}

/// Ordered dithering with [`BAYER_4X4`].
pub fn quantize_bayer(image: &RgbaImage, palette: &Palette) -> RgbaImage {
	quantize_ordered(image, palette, SlotRange::All)
}

fn quantize_plain(image: &RgbaImage, palette: &Palette, range: SlotRange) -> RgbaImage {
	RgbaImage::from_fn(image.width(), image.height(), |x, y| {
		let px = *image.get_pixel(x, y);
		if px[3] < ALPHA_THRESHOLD {
			return px;
		}
		let c = palette.color8(nearest(palette, range, px[0], px[1], px[2]));
		Rgba([c.r, c.g, c.b, px[3]])
	})
}

fn quantize_ordered(image: &RgbaImage, palette: &Palette, range: SlotRange) -> RgbaImage {
	RgbaImage::from_fn(image.width(), image.height(), |x, y| {
		let px = *image.get_pixel(x, y);
		if px[3] < ALPHA_THRESHOLD {
			return px;
		}
		let offset = bayer_offset(x, y);
		let [r, g, b] = [0, 1, 2].map(|ch| to_channel(f32::from(px[ch]) + offset));
		let c = palette.color8(nearest(palette, range, r, g, b));
		Rgba([c.r, c.g, c.b, px[3]])
	})
}

fn quantize_error_diffusion(image: &RgbaImage, palette: &Palette, range: SlotRange) -> RgbaImage {
	let (width, height) = (image.width() as usize, image.height() as usize);
	let mut work: Vec<[f32; 3]> =
		image.pixels().map(|px| [f32::from(px[0]), f32::from(px[1]), f32::from(px[2])]).collect();
	let mut output = image.clone();

	for y in 0..height {
		for x in 0..width {
			let px = *image.get_pixel(x as u32, y as u32);
			if px[3] < ALPHA_THRESHOLD {
				continue;
			}

			let actual = work[y * width + x].map(|v| v.clamp(0.0, 255.0));
			let [r, g, b] = actual.map(to_channel);
			let c = palette.color8(nearest(palette, range, r, g, b));
			output.put_pixel(x as u32, y as u32, Rgba([c.r, c.g, c.b, px[3]]));

			let quantized = [f32::from(c.r), f32::from(c.g), f32::from(c.b)];
			let error = [actual[0] - quantized[0], actual[1] - quantized[1], actual[2] - quantized[2]];

			let mut spread = |dx: isize, dy: usize, weight: f32| {
				let nx = x as isize + dx;
				let ny = y + dy;
				if nx < 0 || nx as usize >= width || ny >= height {
					return;
				}
				let cell = &mut work[ny * width + nx as usize];
				for ch in 0..3 {
					cell[ch] += error[ch] * weight;
				}
			};
			spread(1, 0, 7.0 / 16.0);
			spread(-1, 1, 3.0 / 16.0);
			spread(0, 1, 5.0 / 16.0);
			spread(1, 1, 1.0 / 16.0);
		}
	}

	output
}
