use std::{io::Write, sync::Arc};

use espers_rs::espers_types::asset::{CHARACTERS, table};

use super::*;

#[test]
fn test_headered_and_plain_images_load() {
	let plain = create_rom_bytes();
	let mut headered = vec![0u8; 512];
	headered.extend_from_slice(&plain);
	assert_eq!(headered.len(), 3 * 1024 * 1024 + 512);

	let with_header = CartridgeImage::from_bytes(headered).unwrap();
	assert!(with_header.has_header());
	assert_eq!(with_header.len(), ROM_SIZE);

	let without_header = CartridgeImage::from_bytes(plain).unwrap();
	assert!(!without_header.has_header());
	assert_eq!(with_header.as_bytes(), without_header.as_bytes());
	assert_eq!(with_header.title(), "FINAL FANTASY 3");
	assert_eq!(with_header.region(), RegionVariant::Usa);
}

#[test]
fn test_load_from_disk() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(&create_rom_bytes()).unwrap();
	let rom = CartridgeImage::load(file.path()).unwrap();
	assert_eq!(rom.len(), ROM_SIZE);

	let missing = file.path().with_extension("missing");
	assert!(matches!(CartridgeImage::load(missing), Err(RomError::Io(_))));
}

#[test]
fn test_rejects_bad_images() {
	let short = vec![0u8; ROM_SIZE - 1024];
	assert!(matches!(CartridgeImage::from_bytes(short), Err(RomError::InvalidSize { .. })));

	let untitled = vec![0u8; ROM_SIZE];
	assert!(matches!(CartridgeImage::from_bytes(untitled), Err(RomError::UnrecognizedImage { .. })));
}

#[test_log::test]
fn test_extract_and_decode_field_set() {
	let mut data = create_rom_bytes();

	// Every pixel of every frame uses slot 3
	let field = vec![0x33u8; table::FIELD_SIZE];
	let packed = lz::compress(&field);
	let offset = CHARACTERS[4].field_offset();
	data[offset..offset + packed.len()].copy_from_slice(&packed);

	let extractor = AssetExtractor::new(Arc::new(CartridgeImage::from_bytes(data).unwrap()));
	let report = extractor.load_all_palettes_cached().unwrap();
	assert_eq!(report.loaded, 14);

	let extraction = extractor.field_sprite_cached(4).unwrap();
	assert!(!extraction.used_fallback);
	let sprite = extraction.value;
	assert_eq!(sprite.name(), "Edgar");
	let frames = codec::decode_all(&sprite).unwrap();
	assert_eq!(frames.len(), table::FIELD_FRAME_COUNT);

	let expected = Color5::new(6, 4, 28).to_color();
	for frame in &frames {
		assert_eq!(frame.dimensions(), (16, 24));
		for pixel in frame.pixels() {
			assert_eq!(pixel.0, [expected.r, expected.g, expected.b, 255]);
		}
	}
}

#[test]
fn test_strict_extraction_surfaces_bad_blocks() {
	let mut data = create_rom_bytes();
	let offset = CHARACTERS[2].battle_offset();
	data[offset..offset + 3].copy_from_slice(&[0x01, 0x00, 0x00]);
	let rom = Arc::new(CartridgeImage::from_bytes(data).unwrap());

	let lenient = AssetExtractor::new(Arc::clone(&rom));
	assert!(lenient.extract_battle_sprite(2).unwrap().used_fallback);

	let strict = AssetExtractor::with_config(rom, ExtractConfig::strict());
	assert!(matches!(strict.extract_battle_sprite(2), Err(ExtractError::Decompress { .. })));
}
