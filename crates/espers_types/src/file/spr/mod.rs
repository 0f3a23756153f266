//! Tile-packed, palette-indexed sprite support.
//!
//! Sprites are stored as 8×8 tiles of 4-bit palette indices.
//!
//! # Tile Format
//!
//! Each tile is 32 bytes: 8 rows of 4 bytes. Every byte holds two pixels,
//! the even pixel in the low nibble and the odd pixel in the high nibble.
//! Tiles are laid out row-major across the sprite, and frames follow each
//! other back to back.
//!
//! ```text
//! byte = (index[x + 1] << 4) | index[x]      (x even)
//! tile_offset  = (tile_y * tiles_wide + tile_x) * 32
//! frame_offset = frame * tiles_wide * tiles_high * 32
//! ```
//!
//! Index 0 is always rendered transparent, whatever color the palette holds.
//!
//! # Usage Examples
//!
//! ## Encoding an image
//!
//! ```
//! use espers_types::file::spr::{codec, Color5, Palette, SpriteKind};
//! use image::{Rgba, RgbaImage};
//!
//! let mut palette = Palette::new();
//! palette[1] = Color5::new(31, 0, 0);
//!
//! let image = RgbaImage::from_pixel(16, 24, Rgba([255, 0, 0, 255]));
//! let sprite = codec::encode(&image, &palette, SpriteKind::Character);
//! assert_eq!(sprite.data().len(), 2 * 3 * 32);
//!
//! let decoded = codec::decode(&sprite).unwrap();
//! assert_eq!(decoded.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
//! ```

use std::{borrow::Cow, fmt, sync::Arc};

use crate::file::{CodecError, lz};

pub mod codec;
pub mod palette;

pub use palette::{Color, Color5, Palette, scale_5_to_8, scale_8_to_5};

/// Sprite constants.
pub mod constants {
	/// Tile edge length in pixels
	pub const TILE_SIZE: u32 = 8;

	/// Bytes per 8×8 tile at 4 bits per pixel
	pub const TILE_BYTES: usize = 32;

	/// Bytes per tile row
	pub const TILE_ROW_BYTES: usize = 4;
}

/// Category of sprite, which fixes its canonical pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
	/// Playable character field sprite
	Character,
	/// Battle pose
	Battle,
	/// Menu portrait
	Portrait,
	/// Non-player character
	Npc,
	/// Enemy graphic
	Enemy,
	/// World map sprite
	Overworld,
}

impl SpriteKind {
	/// All kinds, in declaration order.
	pub const ALL: [Self; 6] =
		[Self::Character, Self::Battle, Self::Portrait, Self::Npc, Self::Enemy, Self::Overworld];

	/// Canonical `(width, height)` in pixels.
	pub const fn canonical_size(self) -> (u32, u32) {
		match self {
			Self::Character | Self::Npc => (16, 24),
			Self::Battle => (32, 32),
			Self::Portrait => (40, 40),
			Self::Enemy => (64, 64),
			Self::Overworld => (16, 16),
		}
	}

	/// Checks that `width`×`height` is tile-aligned and equals the canonical size.
	///
	/// # Errors
	///
	/// Returns [`CodecError::InvalidDimensions`] otherwise.
	pub fn validate_dimensions(self, width: u32, height: u32) -> Result<(), CodecError> {
		let (expected_width, expected_height) = self.canonical_size();
		let aligned = width % constants::TILE_SIZE == 0 && height % constants::TILE_SIZE == 0;
		if aligned && width == expected_width && height == expected_height {
			return Ok(());
		}
		Err(CodecError::InvalidDimensions {
			kind: self,
			width,
			height,
			expected_width,
			expected_height,
		})
	}
}

impl fmt::Display for SpriteKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Character => write!(f, "Character"),
			Self::Battle => write!(f, "Battle"),
			Self::Portrait => write!(f, "Portrait"),
			Self::Npc => write!(f, "NPC"),
			Self::Enemy => write!(f, "Enemy"),
			Self::Overworld => write!(f, "Overworld"),
		}
	}
}

/// Number of tiles needed to cover `pixels`.
#[inline]
pub const fn tiles_for(pixels: u32) -> usize {
	pixels.div_ceil(constants::TILE_SIZE) as usize
}

/// Bytes needed for one frame of `width`×`height` pixels.
#[inline]
pub const fn frame_bytes(width: u32, height: u32) -> usize {
	tiles_for(width) * tiles_for(height) * constants::TILE_BYTES
}

/// A validated sprite: geometry, tile payload and palette.
///
/// The palette is reference counted so several sprites (or a cache and an
/// editor) can share one; [`Sprite::palette_mut`] copies on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
	id: u32,
	name: String,
	kind: SpriteKind,
	width: u32,
	height: u32,
	frame_count: usize,
	data: Vec<u8>,
	palette: Arc<Palette>,
	compressed: bool,
}

impl Sprite {
	/// Creates an uncompressed sprite at the kind's canonical size.
	///
	/// # Errors
	///
	/// Returns an error if `frame_count` is zero or `data` is not exactly
	/// `frame_count` frames long.
	pub fn new(
		kind: SpriteKind,
		frame_count: usize,
		data: Vec<u8>,
		palette: Palette,
	) -> Result<Self, CodecError> {
		Self::with_shared_palette(kind, frame_count, data, Arc::new(palette))
	}

	/// Like [`Sprite::new`], sharing an existing palette.
	pub fn with_shared_palette(
		kind: SpriteKind,
		frame_count: usize,
		data: Vec<u8>,
		palette: Arc<Palette>,
	) -> Result<Self, CodecError> {
		if frame_count == 0 {
			return Err(CodecError::NoFrames);
		}
		let (width, height) = kind.canonical_size();
		let expected = frame_bytes(width, height) * frame_count;
		if data.len() != expected {
			return Err(CodecError::PayloadLength {
				expected,
				actual: data.len(),
			});
		}
		Ok(Self::from_parts(kind, frame_count, data, palette, false))
	}

	/// Creates a sprite whose payload is block-compressed.
	///
	/// Payload length is not checked until the sprite is decoded.
	pub fn from_compressed(
		kind: SpriteKind,
		frame_count: usize,
		data: Vec<u8>,
		palette: Palette,
	) -> Result<Self, CodecError> {
		if frame_count == 0 {
			return Err(CodecError::NoFrames);
		}
		Ok(Self::from_parts(kind, frame_count, data, Arc::new(palette), true))
	}

	pub(crate) fn from_parts(
		kind: SpriteKind,
		frame_count: usize,
		data: Vec<u8>,
		palette: Arc<Palette>,
		compressed: bool,
	) -> Self {
		let (width, height) = kind.canonical_size();
		Self {
			id: 0,
			name: String::new(),
			kind,
			width,
			height,
			frame_count,
			data,
			palette,
			compressed,
		}
	}

	/// Sets the identifier.
	pub fn with_id(mut self, id: u32) -> Self {
		self.id = id;
		self
	}

	/// Sets the display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	/// Returns the identifier.
	pub fn id(&self) -> u32 {
		self.id
	}

	/// Returns the display name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the sprite kind.
	pub fn kind(&self) -> SpriteKind {
		self.kind
	}

	/// Width in pixels.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Tiles per row.
	pub fn tiles_wide(&self) -> usize {
		tiles_for(self.width)
	}

	/// Tiles per column.
	pub fn tiles_high(&self) -> usize {
		tiles_for(self.height)
	}

	/// Bytes per frame of tile data.
	pub fn frame_size(&self) -> usize {
		frame_bytes(self.width, self.height)
	}

	/// Number of frames.
	pub fn frame_count(&self) -> usize {
		self.frame_count
	}

	/// Raw (possibly compressed) payload.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Whether [`Sprite::data`] is block-compressed.
	pub fn is_compressed(&self) -> bool {
		self.compressed
	}

	/// Uncompressed tile data for every frame.
	///
	/// # Errors
	///
	/// Returns an error if a compressed payload fails to decompress.
	pub fn tile_data(&self) -> Result<Cow<'_, [u8]>, CodecError> {
		if self.compressed {
			Ok(Cow::Owned(lz::decompress(&self.data)?))
		} else {
			Ok(Cow::Borrowed(&self.data))
		}
	}

	/// Uncompressed tile data for one frame.
	///
	/// # Errors
	///
	/// Returns an error for out-of-range frames, a short payload or a
	/// compressed payload that fails to decompress.
	pub fn frame_payload(&self, index: usize) -> Result<Cow<'_, [u8]>, CodecError> {
		if index >= self.frame_count {
			return Err(CodecError::FrameOutOfRange {
				index,
				count: self.frame_count,
			});
		}
		let size = self.frame_size();
		let start = index * size;
		let end = start + size;
		let truncated = |actual| CodecError::TruncatedData {
			expected: end,
			actual,
		};

		match self.tile_data()? {
			Cow::Borrowed(data) => data.get(start..end).map(Cow::Borrowed).ok_or(truncated(data.len())),
			Cow::Owned(data) => {
				data.get(start..end).map(|frame| Cow::Owned(frame.to_vec())).ok_or(truncated(data.len()))
			}
		}
	}

	/// Returns the palette.
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Returns a handle to the shared palette.
	pub fn shared_palette(&self) -> Arc<Palette> {
		Arc::clone(&self.palette)
	}

	/// Mutable palette access; detaches from other holders first.
	pub fn palette_mut(&mut self) -> &mut Palette {
		Arc::make_mut(&mut self.palette)
	}

	/// Returns a copy of this sprite using `palette`.
	pub fn with_palette(&self, palette: Palette) -> Self {
		Self {
			palette: Arc::new(palette),
			..self.clone()
		}
	}
}

impl fmt::Display for Sprite {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} sprite #{} {:?}: {}x{}, {} frame(s), {} bytes{}",
			self.kind,
			self.id,
			self.name,
			self.width,
			self.height,
			self.frame_count,
			self.data.len(),
			if self.compressed {
				" (compressed)"
			} else {
				""
			}
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_canonical_sizes_tile_aligned() {
		for kind in SpriteKind::ALL {
			let (w, h) = kind.canonical_size();
			assert!(kind.validate_dimensions(w, h).is_ok(), "{kind}");
		}
	}

	#[test]
	fn test_validate_dimensions_rejects() {
		assert!(SpriteKind::Character.validate_dimensions(16, 16).is_err());
		assert!(SpriteKind::Battle.validate_dimensions(31, 32).is_err());
	}

	#[test]
	fn test_payload_invariant() {
		let size = frame_bytes(16, 24);
		assert_eq!(size, 192);
		assert!(Sprite::new(SpriteKind::Character, 2, vec![0; size * 2], Palette::new()).is_ok());
		assert_eq!(
			Sprite::new(SpriteKind::Character, 2, vec![0; size], Palette::new()),
			Err(CodecError::PayloadLength {
				expected: 384,
				actual: 192,
			})
		);
		assert_eq!(
			Sprite::new(SpriteKind::Character, 0, Vec::new(), Palette::new()),
			Err(CodecError::NoFrames)
		);
	}

	#[test]
	fn test_frame_payload() {
		let mut data = vec![0u8; 192 * 2];
		data[192] = 0xAB;
		let sprite = Sprite::new(SpriteKind::Npc, 2, data, Palette::new()).unwrap();
		assert_eq!(sprite.frame_payload(1).unwrap()[0], 0xAB);
		assert!(matches!(sprite.frame_payload(2), Err(CodecError::FrameOutOfRange { .. })));
	}

	#[test]
	fn test_palette_copy_on_write() {
		let a = Sprite::new(SpriteKind::Overworld, 1, vec![0; 128], Palette::grayscale()).unwrap();
		let mut b = a.clone();
		b.palette_mut()[1] = Color5::new(31, 0, 0);
		assert_eq!(a.palette()[1], Palette::grayscale()[1]);
		assert_eq!(b.palette()[1], Color5::new(31, 0, 0));
	}
}
