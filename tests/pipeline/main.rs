//! End-to-end tests for `espers-rs`: cartridge → assets → codec → playback.

mod cartridge;
mod import;
mod playback;

use espers_rs::prelude::*;

/// Size of an unheadered test image
pub const ROM_SIZE: usize = 3 * 1024 * 1024;

/// Builds a HiROM image with a recognizable title and every character palette
/// set to a distinct ramp.
pub fn create_rom_bytes() -> Vec<u8> {
	let mut data = vec![0u8; ROM_SIZE];
	data[0xFFC0..0xFFC0 + 15].copy_from_slice(b"FINAL FANTASY 3");
	for c in espers_rs::espers_types::asset::CHARACTERS.iter() {
		let mut palette = Palette::new();
		for slot in 1..16 {
			palette[slot] = Color5::new(slot as u8 * 2, c.id, 31 - slot as u8);
		}
		let offset = c.palette_offset();
		data[offset..offset + Palette::BYTE_SIZE].copy_from_slice(&palette.to_bytes());
	}
	data
}
