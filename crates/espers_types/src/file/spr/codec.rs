//! Conversion between RGBA images and tile-packed sprite data.
//!
//! Encoding never fails: images are center-cropped or padded onto the kind's
//! canonical canvas without scaling. Decoding is the exact inverse, except that
//! index 0 always comes back fully transparent.

use image::{Rgba, RgbaImage};
use log::debug;

use crate::file::CodecError;

use super::{Palette, Sprite, SpriteKind, constants, frame_bytes, tiles_for};

/// Alpha below this is treated as transparent.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Places `image` centered on a `width`×`height` transparent canvas,
/// cropping whatever does not fit.
pub fn fit_to_canvas(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
	if image.dimensions() == (width, height) {
		return image.clone();
	}

	let offset_x = (i64::from(width) - i64::from(image.width())) / 2;
	let offset_y = (i64::from(height) - i64::from(image.height())) / 2;

	RgbaImage::from_fn(width, height, |x, y| {
		let src_x = i64::from(x) - offset_x;
		let src_y = i64::from(y) - offset_y;
		if src_x < 0 || src_y < 0 || src_x >= i64::from(image.width()) || src_y >= i64::from(image.height()) {
			Rgba([0, 0, 0, 0])
		} else {
			*image.get_pixel(src_x as u32, src_y as u32)
		}
	})
}

/// Maps every pixel of `image` to a palette index, row-major.
///
/// Pixels with alpha below [`ALPHA_THRESHOLD`] become index 0; opaque pixels
/// map to the nearest of slots 1-15 so they never decode as transparent.
pub fn index_pixels(image: &RgbaImage, palette: &Palette) -> Vec<u8> {
	image
		.pixels()
		.map(|px| {
			if px[3] < ALPHA_THRESHOLD {
				Palette::TRANSPARENT_INDEX
			} else {
				palette.nearest_opaque_index(px[0], px[1], px[2])
			}
		})
		.collect()
}

fn ensure_len(actual: usize, expected: usize) -> Result<(), CodecError> {
	if actual < expected {
		return Err(CodecError::TruncatedData {
			expected,
			actual,
		});
	}
	Ok(())
}

/// Packs a row-major index grid into linear 4bpp bytes, even pixel in the low nibble.
///
/// # Errors
///
/// Returns [`CodecError::TruncatedData`] if `indices` holds fewer than
/// `width * height` entries.
pub fn pack_linear(indices: &[u8], width: u32, height: u32) -> Result<Vec<u8>, CodecError> {
	ensure_len(indices.len(), width as usize * height as usize)?;
	Ok(pack_rows(indices, width, height))
}

fn pack_rows(indices: &[u8], width: u32, height: u32) -> Vec<u8> {
	let row_bytes = (width as usize).div_ceil(2);
	let mut packed = vec![0u8; row_bytes * height as usize];
	for y in 0..height as usize {
		for x in 0..width as usize {
			let index = indices[y * width as usize + x] & 0x0F;
			let shift = if x % 2 == 0 {
				0
			} else {
				4
			};
			packed[y * row_bytes + x / 2] |= index << shift;
		}
	}
	packed
}

/// Re-tiles linear 4bpp rows into 8×8 tiles in row-major tile order.
///
/// Pixels of a tile that fall outside the canvas stay index 0.
///
/// # Errors
///
/// Returns [`CodecError::TruncatedData`] if `linear` is shorter than
/// `height` packed rows.
pub fn retile(linear: &[u8], width: u32, height: u32) -> Result<Vec<u8>, CodecError> {
	ensure_len(linear.len(), (width as usize).div_ceil(2) * height as usize)?;
	Ok(tile_rows(linear, width, height))
}

fn tile_rows(linear: &[u8], width: u32, height: u32) -> Vec<u8> {
	let row_bytes = (width as usize).div_ceil(2);
	let tiles_wide = tiles_for(width);
	let tiles_high = tiles_for(height);
	let mut tiles = vec![0u8; frame_bytes(width, height)];

	for tile_y in 0..tiles_high {
		for tile_x in 0..tiles_wide {
			let tile_base = (tile_y * tiles_wide + tile_x) * constants::TILE_BYTES;
			for row in 0..constants::TILE_SIZE as usize {
				let y = tile_y * constants::TILE_SIZE as usize + row;
				if y >= height as usize {
					break;
				}
				for col in 0..constants::TILE_ROW_BYTES {
					let src = y * row_bytes + tile_x * constants::TILE_ROW_BYTES + col;
					if tile_x * constants::TILE_ROW_BYTES + col < row_bytes {
						tiles[tile_base + row * constants::TILE_ROW_BYTES + col] = linear[src];
					}
				}
			}
		}
	}
	tiles
}

/// Unpacks one frame of tile data into a row-major index grid.
///
/// # Errors
///
/// Returns [`CodecError::TruncatedData`] if `data` is shorter than the geometry needs.
pub fn unpack_tiles(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, CodecError> {
	let expected = frame_bytes(width, height);
	ensure_len(data.len(), expected)?;

	let tiles_wide = tiles_for(width);
	let mut indices = vec![0u8; width as usize * height as usize];
	for (tile, bytes) in data[..expected].chunks_exact(constants::TILE_BYTES).enumerate() {
		let origin_x = (tile % tiles_wide) * constants::TILE_SIZE as usize;
		let origin_y = (tile / tiles_wide) * constants::TILE_SIZE as usize;
		for (i, &byte) in bytes.iter().enumerate() {
			let y = origin_y + i / constants::TILE_ROW_BYTES;
			let x = origin_x + (i % constants::TILE_ROW_BYTES) * 2;
			if y >= height as usize {
				continue;
			}
			for (dx, index) in [byte & 0x0F, byte >> 4].into_iter().enumerate() {
				if x + dx < width as usize {
					indices[y * width as usize + x + dx] = index;
				}
			}
		}
	}
	Ok(indices)
}

/// Renders an index grid through a palette; index 0 gets alpha 0.
///
/// # Errors
///
/// Returns [`CodecError::TruncatedData`] if `indices` holds fewer than
/// `width * height` entries.
pub fn render_indices(
	indices: &[u8],
	width: u32,
	height: u32,
	palette: &Palette,
) -> Result<RgbaImage, CodecError> {
	ensure_len(indices.len(), width as usize * height as usize)?;
	Ok(RgbaImage::from_fn(width, height, |x, y| {
		let index = indices[y as usize * width as usize + x as usize];
		let mut color = palette.color8(index);
		if index == Palette::TRANSPARENT_INDEX {
			color.a = 0;
		}
		color.into()
	}))
}

// The canvas always matches the geometry, so the unchecked helpers apply.
fn encode_frame(image: &RgbaImage, palette: &Palette, width: u32, height: u32) -> Vec<u8> {
	let canvas = fit_to_canvas(image, width, height);
	let indices = index_pixels(&canvas, palette);
	tile_rows(&pack_rows(&indices, width, height), width, height)
}

/// Encodes an image as a single-frame sprite of `kind`.
pub fn encode(image: &RgbaImage, palette: &Palette, kind: SpriteKind) -> Sprite {
	encode_frames(std::slice::from_ref(image), palette, kind)
}

/// Encodes several images as consecutive frames of one sprite.
///
/// An empty slice yields a single blank frame.
pub fn encode_frames(images: &[RgbaImage], palette: &Palette, kind: SpriteKind) -> Sprite {
	let (width, height) = kind.canonical_size();
	let mut data = Vec::with_capacity(frame_bytes(width, height) * images.len().max(1));
	for image in images {
		data.extend(encode_frame(image, palette, width, height));
	}
	if images.is_empty() {
		data.resize(frame_bytes(width, height), 0);
	}

	let frame_count = images.len().max(1);
	debug!("Encoded {frame_count} {kind} frame(s) into {} bytes", data.len());
	Sprite::from_parts(kind, frame_count, data, std::sync::Arc::new(*palette), false)
}

/// Decodes one frame of a sprite.
///
/// # Errors
///
/// Returns an error if the frame is out of range, the payload is truncated, or a
/// compressed payload fails to decompress.
pub fn decode_frame(sprite: &Sprite, index: usize) -> Result<RgbaImage, CodecError> {
	let payload = sprite.frame_payload(index)?;
	let indices = unpack_tiles(&payload, sprite.width(), sprite.height())?;
	render_indices(&indices, sprite.width(), sprite.height(), sprite.palette())
}

/// Decodes the first frame of a sprite.
///
/// # Errors
///
/// See [`decode_frame`].
pub fn decode(sprite: &Sprite) -> Result<RgbaImage, CodecError> {
	decode_frame(sprite, 0)
}

/// Decodes every frame of a sprite.
///
/// # Errors
///
/// See [`decode_frame`].
pub fn decode_all(sprite: &Sprite) -> Result<Vec<RgbaImage>, CodecError> {
	let tile_data = sprite.tile_data()?;
	let size = sprite.frame_size();
	(0..sprite.frame_count())
		.map(|frame| {
			let start = (frame * size).min(tile_data.len());
			let indices = unpack_tiles(&tile_data[start..], sprite.width(), sprite.height())?;
			render_indices(&indices, sprite.width(), sprite.height(), sprite.palette())
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::{lz, spr::Color5};

	fn red_palette() -> Palette {
		let mut palette = Palette::new();
		palette[1] = Color5::new(31, 0, 0);
		palette
	}

	#[test]
	fn test_encode_solid_character() {
		let image = RgbaImage::from_pixel(16, 24, Rgba([255, 0, 0, 255]));
		let sprite = encode(&image, &red_palette(), SpriteKind::Character);
		assert_eq!(sprite.data().len(), 192);
		assert!(sprite.data().iter().all(|&b| b == 0x11));

		let decoded = decode(&sprite).unwrap();
		assert!(decoded.pixels().all(|px| *px == Rgba([255, 0, 0, 255])));
	}

	#[test]
	fn test_nibble_order_and_tile_order() {
		let mut palette = Palette::grayscale();
		palette[1] = Color5::new(31, 0, 0);
		palette[2] = Color5::new(0, 31, 0);
		palette[3] = Color5::new(0, 0, 31);
		let mut image = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0]));
		image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
		image.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
		// first pixel of the second tile
		image.put_pixel(8, 0, Rgba([0, 0, 255, 255]));

		let sprite = encode(&image, &palette, SpriteKind::Overworld);
		assert_eq!(sprite.data()[0], 0x21);
		assert_eq!(sprite.data()[32], 0x03);
		assert_eq!(sprite.data().iter().filter(|&&b| b != 0).count(), 2);
	}

	#[test]
	fn test_transparency_roundtrip() {
		let mut palette = red_palette();
		palette[0] = Color5::new(31, 31, 31);
		palette[2] = Color5::new(0, 0, 31);
		let image = RgbaImage::from_fn(32, 32, |x, y| match (x + y) % 3 {
			0 => Rgba([255, 0, 0, 255]),
			1 => Rgba([0, 0, 255, 200]),
			_ => Rgba([255, 255, 255, 100]),
		});

		let decoded = decode(&encode(&image, &palette, SpriteKind::Battle)).unwrap();
		for (x, y, px) in image.enumerate_pixels() {
			let out = decoded.get_pixel(x, y);
			if px[3] < ALPHA_THRESHOLD {
				assert_eq!(out[3], 0);
			} else {
				assert_eq!(&out.0[..3], &px.0[..3]);
				assert_eq!(out[3], 255);
			}
		}
	}

	#[test]
	fn test_center_pad_and_crop() {
		let small = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
		let canvas = fit_to_canvas(&small, 16, 24);
		assert_eq!(canvas.get_pixel(4, 8)[3], 255);
		assert_eq!(canvas.get_pixel(3, 8)[3], 0);
		assert_eq!(canvas.get_pixel(11, 15)[3], 255);
		assert_eq!(canvas.get_pixel(12, 15)[3], 0);

		let big = RgbaImage::from_fn(20, 24, |x, _| Rgba([x as u8, 0, 0, 255]));
		let cropped = fit_to_canvas(&big, 16, 24);
		assert_eq!(cropped.get_pixel(0, 0)[0], 2);
		assert_eq!(cropped.get_pixel(15, 0)[0], 17);
	}

	#[test]
	fn test_unpack_non_tile_aligned() {
		// 12 pixels wide: the right tile is half filled
		let indices: Vec<u8> = (0..12 * 8).map(|i| (i % 15 + 1) as u8).collect();
		let tiles = retile(&pack_linear(&indices, 12, 8).unwrap(), 12, 8).unwrap();
		assert_eq!(tiles.len(), 64);
		assert_eq!(unpack_tiles(&tiles, 12, 8).unwrap(), indices);
	}

	#[test]
	fn test_short_buffers_are_rejected() {
		let indices = vec![1u8; 16 * 24 - 1];
		assert_eq!(
			pack_linear(&indices, 16, 24),
			Err(CodecError::TruncatedData {
				expected: 384,
				actual: 383,
			})
		);
		assert_eq!(
			render_indices(&indices, 16, 24, &red_palette()),
			Err(CodecError::TruncatedData {
				expected: 384,
				actual: 383,
			})
		);
		assert_eq!(
			retile(&[0x11; 100], 16, 24),
			Err(CodecError::TruncatedData {
				expected: 192,
				actual: 100,
			})
		);

		let image = render_indices(&[1, 0, 1, 0], 2, 2, &red_palette()).unwrap();
		assert_eq!(image.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
		assert_eq!(image.get_pixel(1, 1)[3], 0);
	}

	#[test]
	fn test_decode_truncated() {
		let sprite = Sprite::from_parts(
			SpriteKind::Character,
			1,
			vec![0; 100],
			std::sync::Arc::new(Palette::new()),
			false,
		);
		assert_eq!(
			decode(&sprite),
			Err(CodecError::TruncatedData {
				expected: 192,
				actual: 100,
			})
		);
	}

	#[test]
	fn test_decode_compressed_frames() {
		let palette = red_palette();
		let frames = vec![
			RgbaImage::from_pixel(16, 24, Rgba([255, 0, 0, 255])),
			RgbaImage::from_pixel(16, 24, Rgba([0, 0, 0, 0])),
		];
		let plain = encode_frames(&frames, &palette, SpriteKind::Npc);
		let packed =
			Sprite::from_compressed(SpriteKind::Npc, 2, lz::compress(plain.data()), palette).unwrap();

		let decoded = decode_all(&packed).unwrap();
		assert_eq!(decoded.len(), 2);
		assert_eq!(decoded[0].get_pixel(5, 5), &Rgba([255, 0, 0, 255]));
		assert_eq!(decoded[1].get_pixel(5, 5)[3], 0);
		assert_eq!(decode_frame(&packed, 1).unwrap(), decoded[1]);
	}
}
