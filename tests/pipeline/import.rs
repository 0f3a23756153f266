use image::{Rgba, RgbaImage};

use super::*;

#[test]
fn test_solid_character_scenario() {
	let mut palette = Palette::new();
	palette[1] = Color5::new(31, 0, 0);
	let image = RgbaImage::from_pixel(16, 24, Rgba([255, 0, 0, 255]));

	let sprite = codec::encode(&image, &palette, SpriteKind::Character);
	assert_eq!(sprite.data().len(), 2 * 3 * 32);
	assert!(sprite.data().iter().all(|&b| b == 0x11));

	let decoded = codec::decode(&sprite).unwrap();
	assert!(decoded.pixels().all(|p| p.0 == [255, 0, 0, 255]));
}

#[test]
fn test_roundtrip_preserves_transparency() {
	let red = Rgba([255, 0, 0, 255]);
	let green = Rgba([0, 255, 0, 200]);
	let clear = Rgba([9, 9, 9, 100]);
	let image = RgbaImage::from_fn(32, 32, |x, y| match (x + y) % 3 {
		0 => red,
		1 => green,
		_ => clear,
	});

	let sprite = import_image(&image, SpriteKind::Battle, &ImportOptions::default());
	let decoded = codec::decode(&sprite).unwrap();

	for (x, y, pixel) in image.enumerate_pixels() {
		let out = decoded.get_pixel(x, y);
		if pixel[3] < 128 {
			assert_eq!(out[3], 0, "({x}, {y}) should be transparent");
		} else {
			assert_eq!(out[3], 255);
			assert_eq!(&out.0[..3], &pixel.0[..3], "({x}, {y})");
		}
	}
}

#[test]
fn test_compressed_payload_roundtrip() {
	let image = RgbaImage::from_fn(16, 16, |x, _| {
		if x < 8 {
			Rgba([0, 0, 255, 255])
		} else {
			Rgba([255, 255, 0, 255])
		}
	});
	let sprite = import_image(&image, SpriteKind::Overworld, &ImportOptions::default());

	let packed = lz::compress(sprite.data());
	let stored = Sprite::from_compressed(SpriteKind::Overworld, 1, packed, *sprite.palette()).unwrap();
	assert!(stored.is_compressed());
	assert_eq!(codec::decode(&stored).unwrap(), codec::decode(&sprite).unwrap());
}

#[test]
fn test_dither_modes_stay_in_palette() {
	let image = RgbaImage::from_fn(64, 64, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, 128, 255]));
	for dither in [DitherMode::None, DitherMode::FloydSteinberg, DitherMode::Bayer] {
		let options = ImportOptions {
			dither,
			max_colors: 8,
			..ImportOptions::default()
		};
		let sprite = import_image(&image, SpriteKind::Enemy, &options);
		let allowed: Vec<_> = sprite.palette().colors()[1..9].iter().map(|c| c.to_color()).collect();

		let decoded = codec::decode(&sprite).unwrap();
		for pixel in decoded.pixels() {
			let color = Color::new(pixel[0], pixel[1], pixel[2], pixel[3]);
			assert!(allowed.contains(&color), "{dither}: {color:?} not in palette");
		}
	}
}
