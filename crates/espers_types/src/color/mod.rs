//! Palette extraction, quantization and dithering.
//!
//! This is the import half of the sprite pipeline: an arbitrary RGBA image is
//! reduced to at most 16 colors and then handed to the tile codec.
//!
//! # Examples
//!
//! ```
//! use espers_types::color::{self, DitherMode, ImportOptions};
//! use espers_types::file::SpriteKind;
//! use image::{Rgba, RgbaImage};
//!
//! let image = RgbaImage::from_pixel(16, 24, Rgba([200, 40, 40, 255]));
//! let options = ImportOptions {
//!     dither: DitherMode::FloydSteinberg,
//!     ..ImportOptions::default()
//! };
//! let sprite = color::import_image(&image, SpriteKind::Character, &options);
//! assert_eq!(sprite.data().len(), 192);
//! ```

use std::fmt;

use image::RgbaImage;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::file::spr::{Palette, Sprite, SpriteKind, codec};

pub mod dither;
pub mod extract;

pub use dither::{BAYER_4X4, quantize, quantize_bayer, quantize_floyd_steinberg, quantize_no_dither};
pub use extract::{color_histogram, extract, extract_sprite_palette};

/// Dithering applied during quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DitherMode {
	/// Plain nearest-color mapping
	#[default]
	None,
	/// Error diffusion with the 7/3/5/1 kernel
	FloydSteinberg,
	/// 4×4 ordered threshold matrix
	Bayer,
}

impl fmt::Display for DitherMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::None => write!(f, "none"),
			Self::FloydSteinberg => write!(f, "floyd-steinberg"),
			Self::Bayer => write!(f, "bayer"),
		}
	}
}

/// Palette slots a quantizer may pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlotRange {
	/// All 16 slots
	#[default]
	All,
	/// Slots 1-15; slot 0 stays reserved for transparency
	Opaque,
}

/// Settings for [`import_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
	/// Dithering mode
	pub dither: DitherMode,
	/// Upper bound on extracted colors (at most 16 are used)
	pub max_colors: usize,
	/// Honor the source alpha channel.
	///
	/// Slot 0 always decodes transparent, so extracted colors land in slots
	/// 1-15 either way. When this is `false` the source is treated as fully
	/// opaque and only the canvas padding stays transparent.
	pub reserve_transparent: bool,
}

impl Default for ImportOptions {
	fn default() -> Self {
		Self {
			dither: DitherMode::None,
			max_colors: 16,
			reserve_transparent: true,
		}
	}
}

/// Imports an arbitrary image as a single-frame sprite of `kind`.
///
/// The image is fitted to the kind's canvas, a palette is extracted from it,
/// the pixels are quantized with the requested dithering and the result is
/// tile-encoded.
pub fn import_image(image: &RgbaImage, kind: SpriteKind, options: &ImportOptions) -> Sprite {
	let (width, height) = kind.canonical_size();
	let canvas = if options.reserve_transparent {
		codec::fit_to_canvas(image, width, height)
	} else {
		codec::fit_to_canvas(&flatten_alpha(image), width, height)
	};

	let palette = extract_sprite_palette(&canvas, options.max_colors);
	debug!("Importing {}x{} image as {kind}, dither {}", image.width(), image.height(), options.dither);

	let quantized = quantize(&canvas, &palette, options.dither, SlotRange::Opaque);
	codec::encode(&quantized, &palette, kind)
}

fn flatten_alpha(image: &RgbaImage) -> RgbaImage {
	let mut opaque = image.clone();
	for px in opaque.pixels_mut() {
		px[3] = u8::MAX;
	}
	opaque
}

/// Imports an image with an existing palette instead of extracting one.
pub fn import_with_palette(
	image: &RgbaImage,
	palette: &Palette,
	kind: SpriteKind,
	dither: DitherMode,
) -> Sprite {
	let (width, height) = kind.canonical_size();
	let canvas = codec::fit_to_canvas(image, width, height);
	let quantized = quantize(&canvas, palette, dither, SlotRange::Opaque);
	codec::encode(&quantized, palette, kind)
}

#[cfg(test)]
mod tests {
	use image::Rgba;

	use super::*;
	use crate::file::spr::Color5;

	#[test]
	fn test_import_roundtrip_few_colors() {
		let colors = [Rgba([248, 0, 0, 255]), Rgba([0, 0, 248, 255]), Rgba([0, 0, 0, 0])];
		let image = RgbaImage::from_fn(32, 32, |x, y| colors[((x / 4 + y) % 3) as usize]);

		for dither in [DitherMode::None, DitherMode::FloydSteinberg] {
			let options = ImportOptions {
				dither,
				..ImportOptions::default()
			};
			let sprite = import_image(&image, SpriteKind::Battle, &options);
			let decoded = codec::decode(&sprite).unwrap();
			for (x, y, px) in image.enumerate_pixels() {
				let out = decoded.get_pixel(x, y);
				if px[3] == 0 {
					assert_eq!(out[3], 0);
				} else {
					let expected = Color5::from_rgb8(px[0], px[1], px[2]).to_color();
					assert_eq!(&out.0[..3], &[expected.r, expected.g, expected.b]);
				}
			}
		}
	}

	#[test]
	fn test_import_opaque_source_keeps_dominant_color() {
		let image = RgbaImage::from_fn(16, 24, |x, _| {
			if x < 12 {
				Rgba([255, 0, 0, 255])
			} else {
				Rgba([0, 0, 255, 255])
			}
		});
		let options = ImportOptions {
			reserve_transparent: false,
			..ImportOptions::default()
		};
		let sprite = import_image(&image, SpriteKind::Character, &options);
		assert_eq!(sprite.palette()[1], Color5::new(31, 0, 0));
		assert_eq!(sprite.palette()[2], Color5::new(0, 0, 31));

		let decoded = codec::decode(&sprite).unwrap();
		assert_eq!(decoded.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
		assert_eq!(decoded.get_pixel(11, 23), &Rgba([255, 0, 0, 255]));
		assert_eq!(decoded.get_pixel(12, 0), &Rgba([0, 0, 255, 255]));
	}

	#[test]
	fn test_import_opaque_source_ignores_alpha() {
		let image = RgbaImage::from_pixel(16, 16, Rgba([0, 248, 0, 10]));
		let options = ImportOptions {
			reserve_transparent: false,
			..ImportOptions::default()
		};
		let sprite = import_image(&image, SpriteKind::Overworld, &options);
		let decoded = codec::decode(&sprite).unwrap();
		assert!(decoded.pixels().all(|px| px.0 == [0, 255, 0, 255]));

		let sprite = import_image(&image, SpriteKind::Overworld, &ImportOptions::default());
		let decoded = codec::decode(&sprite).unwrap();
		assert!(decoded.pixels().all(|px| px[3] == 0));
	}

	#[test]
	fn test_import_options_default() {
		let options = ImportOptions::default();
		assert_eq!(options.max_colors, 16);
		assert!(options.reserve_transparent);
		assert_eq!(options.dither, DitherMode::None);
	}

	#[test]
	fn test_import_with_palette_black_is_opaque() {
		let mut palette = Palette::new();
		palette[1] = Color5::new(0, 0, 0);
		let image = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 255]));
		let sprite = import_with_palette(&image, &palette, SpriteKind::Overworld, DitherMode::Bayer);
		assert!(sprite.data().iter().all(|&b| b == 0x11));
	}
}
