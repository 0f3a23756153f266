//! Sprite color model.
//!
//! The cartridge stores colors as 15-bit words, 5 bits per channel. Sprites
//! reference colors through a 16-slot palette; slot 0 is rendered transparent.
//!
//! # Binary Layout
//!
//! A palette is 32 bytes: 16 little-endian words.
//!
//! ```text
//! low byte   GGGRRRRR
//! high byte  XBBBBBGG
//! ```

use std::fmt;

use image::Rgba;

use crate::file::PaletteError;

/// Scales a 5-bit channel (0-31) to 8 bits: `round(c * 255 / 31)`.
#[inline]
pub const fn scale_5_to_8(c: u8) -> u8 {
	((c as u32 * 255 + 15) / 31) as u8
}

/// Scales an 8-bit channel to 5 bits: `round(c * 31 / 255)`.
#[inline]
pub const fn scale_8_to_5(c: u8) -> u8 {
	((c as u32 * 31 + 127) / 255) as u8
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Returns the color as a 32-bit RGBA value.
	pub const fn to_rgba32(&self) -> u32 {
		((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | (self.a as u32)
	}
}

impl From<Rgba<u8>> for Color {
	fn from(px: Rgba<u8>) -> Self {
		Self::new(px[0], px[1], px[2], px[3])
	}
}

impl From<Color> for Rgba<u8> {
	fn from(c: Color) -> Self {
		Rgba([c.r, c.g, c.b, c.a])
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// 15-bit cartridge color, 5 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color5 {
	/// Red component (0-31)
	pub r: u8,
	/// Green component (0-31)
	pub g: u8,
	/// Blue component (0-31)
	pub b: u8,
}

impl Color5 {
	/// Black
	pub const BLACK: Self = Self::new(0, 0, 0);

	/// Creates a color, masking each channel to 5 bits.
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self {
			r: r & 0x1F,
			g: g & 0x1F,
			b: b & 0x1F,
		}
	}

	/// Unpacks a `0BBBBBGGGGGRRRRR` word.
	pub const fn from_word(word: u16) -> Self {
		Self::new((word & 0x1F) as u8, ((word >> 5) & 0x1F) as u8, ((word >> 10) & 0x1F) as u8)
	}

	/// Packs into a `0BBBBBGGGGGRRRRR` word.
	pub const fn to_word(self) -> u16 {
		(self.r as u16) | ((self.g as u16) << 5) | ((self.b as u16) << 10)
	}

	/// Converts from 8-bit channels.
	pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
		Self::new(scale_8_to_5(r), scale_8_to_5(g), scale_8_to_5(b))
	}

	/// Converts to an opaque 8-bit color.
	pub const fn to_color(self) -> Color {
		Color::rgb(scale_5_to_8(self.r), scale_5_to_8(self.g), scale_5_to_8(self.b))
	}
}

impl From<Color> for Color5 {
	fn from(c: Color) -> Self {
		Self::from_rgb8(c.r, c.g, c.b)
	}
}

impl fmt::Display for Color5 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGB5({}, {}, {})", self.r, self.g, self.b)
	}
}

/// 16-slot sprite palette.
///
/// `Clone` is a full value copy; editors that hand a palette across an edit
/// boundary never share slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Palette {
	colors: [Color5; 16],
}

impl Palette {
	/// Number of slots
	pub const SIZE: usize = 16;

	/// Size of a palette record in bytes
	pub const BYTE_SIZE: usize = Self::SIZE * 2;

	/// Slot rendered as transparent
	pub const TRANSPARENT_INDEX: u8 = 0;

	/// Creates a palette with every slot black.
	pub const fn new() -> Self {
		Self {
			colors: [Color5::BLACK; 16],
		}
	}

	/// Creates a palette from 16 colors.
	pub const fn from_colors(colors: [Color5; 16]) -> Self {
		Self {
			colors,
		}
	}

	/// Converts up to 16 8-bit colors to 5-bit slots, filling from slot 0.
	///
	/// Alpha is ignored; unfilled slots stay black.
	pub fn from_rgba(colors: &[Color]) -> Self {
		let mut palette = Self::new();
		for (slot, c) in palette.colors.iter_mut().zip(colors) {
			*slot = Color5::from_rgb8(c.r, c.g, c.b);
		}
		palette
	}

	/// A deterministic gray ramp, slot `i` at level `i * 2`.
	///
	/// Used wherever a palette could not be read.
	pub fn grayscale() -> Self {
		let mut colors = [Color5::BLACK; 16];
		for (i, slot) in colors.iter_mut().enumerate() {
			let level = (i * 2) as u8;
			*slot = Color5::new(level, level, level);
		}
		Self {
			colors,
		}
	}

	/// Parses a 32-byte palette record.
	///
	/// # Errors
	///
	/// Returns [`PaletteError::InsufficientData`] if fewer than 32 bytes are given.
	pub fn from_bytes(data: &[u8]) -> Result<Self, PaletteError> {
		if data.len() < Self::BYTE_SIZE {
			return Err(PaletteError::InsufficientData {
				expected: Self::BYTE_SIZE,
				actual: data.len(),
			});
		}

		let mut colors = [Color5::BLACK; 16];
		for (slot, word) in colors.iter_mut().zip(data.chunks_exact(2)) {
			*slot = Color5::from_word(u16::from_le_bytes([word[0], word[1]]));
		}
		Ok(Self {
			colors,
		})
	}

	/// Serializes to a 32-byte palette record.
	pub fn to_bytes(&self) -> [u8; Self::BYTE_SIZE] {
		let mut bytes = [0u8; Self::BYTE_SIZE];
		for (chunk, color) in bytes.chunks_exact_mut(2).zip(self.colors.iter()) {
			chunk.copy_from_slice(&color.to_word().to_le_bytes());
		}
		bytes
	}

	/// Gets a slot, or `None` past slot 15.
	#[inline]
	pub fn get(&self, index: usize) -> Option<Color5> {
		self.colors.get(index).copied()
	}

	/// Sets a slot.
	///
	/// # Errors
	///
	/// Returns [`PaletteError::SlotOutOfRange`] past slot 15.
	pub fn set(&mut self, index: usize, color: Color5) -> Result<(), PaletteError> {
		let slot = self.colors.get_mut(index).ok_or(PaletteError::SlotOutOfRange(index))?;
		*slot = color;
		Ok(())
	}

	/// Returns all slots.
	#[inline]
	pub fn colors(&self) -> &[Color5; 16] {
		&self.colors
	}

	/// Returns the 8-bit rendering of a slot. Out-of-range indices wrap to the low nibble.
	#[inline]
	pub fn color8(&self, index: u8) -> Color {
		self.colors[(index & 0x0F) as usize].to_color()
	}

	/// Index of the slot nearest to an 8-bit color.
	///
	/// Distance is squared Euclidean in 8-bit RGB; ties go to the lowest index.
	pub fn nearest_index(&self, r: u8, g: u8, b: u8) -> u8 {
		self.nearest_in(0, r, g, b)
	}

	/// Like [`Palette::nearest_index`] but never returns the transparent slot.
	pub fn nearest_opaque_index(&self, r: u8, g: u8, b: u8) -> u8 {
		self.nearest_in(1, r, g, b)
	}

	fn nearest_in(&self, first: usize, r: u8, g: u8, b: u8) -> u8 {
		let mut best_index = first;
		let mut best_distance = u32::MAX;
		for (i, slot) in self.colors.iter().enumerate().skip(first) {
			let c = slot.to_color();
			let dr = i32::from(c.r) - i32::from(r);
			let dg = i32::from(c.g) - i32::from(g);
			let db = i32::from(c.b) - i32::from(b);
			let distance = (dr * dr + dg * dg + db * db) as u32;
			if distance < best_distance {
				best_distance = distance;
				best_index = i;
			}
		}
		best_index as u8
	}

	/// Returns an iterator over slots with indices.
	pub fn iter_indexed(&self) -> impl Iterator<Item = (u8, &Color5)> {
		self.colors.iter().enumerate().map(|(i, c)| (i as u8, c))
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let words: Vec<String> = self.colors.iter().map(|c| format!("{:04X}", c.to_word())).collect();
		write!(f, "Palette[{}]", words.join(" "))
	}
}

impl std::ops::Index<usize> for Palette {
	type Output = Color5;

	fn index(&self, index: usize) -> &Self::Output {
		&self.colors[index]
	}
}

impl std::ops::IndexMut<usize> for Palette {
	fn index_mut(&mut self, index: usize) -> &mut Self::Output {
		&mut self.colors[index]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_scale_fixed_points() {
		for c in 0..32u8 {
			assert_eq!(scale_8_to_5(scale_5_to_8(c)), c);
		}
		assert_eq!(scale_5_to_8(0), 0);
		assert_eq!(scale_5_to_8(31), 255);
		// bit replication gives 24 and 198 here
		assert_eq!(scale_5_to_8(3), 25);
		assert_eq!(scale_5_to_8(24), 197);
	}

	#[test]
	fn test_scale_roundtrip_error() {
		for c in 0..=255u8 {
			let back = scale_5_to_8(scale_8_to_5(c));
			assert!((i16::from(back) - i16::from(c)).abs() <= 4, "{c} -> {back}");
		}
	}

	#[test]
	fn test_word_layout() {
		// low byte GGGRRRRR, high byte XBBBBBGG
		let color = Color5::from_word(u16::from_le_bytes([0b1110_0001, 0b0000_1001]));
		assert_eq!(color, Color5::new(1, 0b01_111, 0b00010));
		assert_eq!(Color5::new(31, 0, 0).to_word().to_le_bytes(), [0x1F, 0x00]);
		assert_eq!(Color5::new(0, 31, 0).to_word().to_le_bytes(), [0xE0, 0x03]);
		assert_eq!(Color5::new(0, 0, 31).to_word().to_le_bytes(), [0x00, 0x7C]);
	}

	#[test]
	fn test_high_bit_ignored() {
		assert_eq!(Color5::from_word(0x8000), Color5::BLACK);
	}

	#[test]
	fn test_palette_bytes_roundtrip() {
		let mut palette = Palette::grayscale();
		palette.set(3, Color5::new(31, 4, 9)).unwrap();
		let bytes = palette.to_bytes();
		assert_eq!(bytes.len(), 32);
		assert_eq!(Palette::from_bytes(&bytes).unwrap(), palette);
	}

	#[test]
	fn test_palette_insufficient_data() {
		assert_eq!(
			Palette::from_bytes(&[0u8; 31]),
			Err(PaletteError::InsufficientData {
				expected: 32,
				actual: 31,
			})
		);
	}

	#[test]
	fn test_set_out_of_range() {
		let mut palette = Palette::new();
		assert_eq!(palette.set(16, Color5::BLACK), Err(PaletteError::SlotOutOfRange(16)));
		assert_eq!(palette.get(16), None);
	}

	#[test]
	fn test_clone_is_independent() {
		let original = Palette::grayscale();
		let mut edited = original;
		edited[5] = Color5::new(31, 31, 0);
		assert_ne!(original[5], edited[5]);
	}

	#[test]
	fn test_nearest_index_ties_lowest() {
		let mut palette = Palette::new();
		palette[2] = Color5::new(31, 0, 0);
		palette[7] = Color5::new(31, 0, 0);
		assert_eq!(palette.nearest_index(250, 5, 5), 2);
		// all-black slots tie; slot 0 wins
		assert_eq!(palette.nearest_index(0, 0, 0), 0);
		assert_eq!(palette.nearest_opaque_index(0, 0, 0), 1);
	}

	#[test]
	fn test_from_rgba() {
		let colors = [Color::rgb(255, 0, 0), Color::new(0, 255, 0, 0)];
		let palette = Palette::from_rgba(&colors);
		assert_eq!(palette[0], Color5::new(31, 0, 0));
		assert_eq!(palette[1], Color5::new(0, 31, 0));
		assert_eq!(palette[2], Color5::BLACK);
	}
}
