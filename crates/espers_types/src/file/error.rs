//! Error types for cartridge, compression and sprite format handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or reading a cartridge image
#[derive(Debug, Error)]
pub enum RomError {
	/// The image could not be read from disk
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// Size after header stripping is not one of the accepted cartridge sizes
	#[error("Invalid cartridge size: {actual} bytes (expected 3 MiB or 4 MiB after header strip)")]
	InvalidSize {
		/// Size of the image after the optional copier header was removed
		actual: usize,
	},

	/// Neither header location carries a known title
	#[error("Unrecognized cartridge image: title {title:?}")]
	UnrecognizedImage {
		/// Title read from the last candidate header location
		title: String,
	},

	/// A read touched bytes outside the image
	#[error("Read out of bounds: offset 0x{offset:06X} + {length} bytes exceeds image size {size}")]
	OutOfBounds {
		/// Requested start offset
		offset: usize,
		/// Requested length
		length: usize,
		/// Size of the image
		size: usize,
	},

	/// No conventional location held a loadable image
	#[error("No cartridge image found (searched {} candidates)", searched.len())]
	NotFound {
		/// Every path that was attempted
		searched: Vec<PathBuf>,
	},
}

/// Errors that can occur when decompressing a block
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecompressError {
	/// A back-reference points before the start of the output buffer
	#[error(
		"Invalid back-reference: offset {offset} at output position {position} reads before start of output"
	)]
	InvalidBackReference {
		/// Distance behind the write position (1-4096)
		offset: usize,
		/// Output length when the reference was decoded
		position: usize,
	},
}

/// Errors that can occur when parsing palette data
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaletteError {
	/// Not enough data for a full 16-color record
	#[error("Insufficient palette data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Slot index outside 0..16
	#[error("Palette slot {0} out of range (0-15)")]
	SlotOutOfRange(usize),
}

/// Errors that can occur when building or decoding sprites
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
	/// Payload is shorter than the tile geometry requires
	#[error("Truncated sprite data: expected {expected} bytes, got {actual} bytes")]
	TruncatedData {
		/// Bytes required by the geometry
		expected: usize,
		/// Bytes available in the payload
		actual: usize,
	},

	/// Dimensions are not multiples of the tile size or disagree with the sprite kind
	#[error("Invalid dimensions {width}x{height} for {kind} sprite (expected {expected_width}x{expected_height})")]
	InvalidDimensions {
		/// Sprite kind being validated
		kind: super::spr::SpriteKind,
		/// Requested width
		width: u32,
		/// Requested height
		height: u32,
		/// Canonical width for the kind
		expected_width: u32,
		/// Canonical height for the kind
		expected_height: u32,
	},

	/// Uncompressed payload length does not match the geometry
	#[error("Payload length mismatch: expected {expected} bytes, got {actual} bytes")]
	PayloadLength {
		/// Bytes required by the geometry and frame count
		expected: usize,
		/// Bytes supplied
		actual: usize,
	},

	/// A sprite must hold at least one frame
	#[error("Sprite frame count must be at least 1")]
	NoFrames,

	/// Frame index past the end of the sprite
	#[error("Frame {index} out of range (sprite has {count} frames)")]
	FrameOutOfRange {
		/// Requested frame
		index: usize,
		/// Number of frames in the sprite
		count: usize,
	},

	/// Compressed payload failed to decompress
	#[error(transparent)]
	Decompress(#[from] DecompressError),
}
