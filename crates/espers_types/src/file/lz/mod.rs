//! LZ77-family block compression used for assets embedded in the cartridge.
//!
//! ## Stream Format
//!
//! The stream is a sequence of groups. Each group starts with a control byte
//! whose bits are consumed least-significant first, one per item:
//!
//! | Bit | Item                                                        |
//! |-----|-------------------------------------------------------------|
//! | 0   | Literal: copy the next input byte to the output             |
//! | 1   | Back-reference: the next two bytes `b1, b2` encode a copy    |
//!
//! A back-reference is decoded as:
//!
//! ```text
//! length = ((b1 >> 4) & 0xF) + 3                 // 3..=18
//! offset = (((b1 & 0xF) << 8) | b2) + 1          // 1..=4096
//! ```
//!
//! and copies `length` bytes starting `offset` bytes behind the current write
//! position, one byte at a time. A reference may overlap the bytes it is
//! producing, which is how runs of a repeated byte are encoded.
//!
//! Blocks are read from the cartridge with a fixed window that is usually
//! longer than the compressed data, so a truncated trailing group simply ends
//! decoding.
//!
//! ## Example
//!
//! ```
//! use espers_types::file::lz;
//!
//! let raw = b"ABABABABABABAB".to_vec();
//! let packed = lz::compress(&raw);
//! assert_eq!(lz::decompress(&packed).unwrap(), raw);
//! ```

mod decode;
mod encode;

pub use decode::decompress;
pub use encode::compress;

/// Compression constants.
pub mod constants {
	/// Shortest back-reference
	pub const MIN_MATCH: usize = 3;

	/// Longest back-reference
	pub const MAX_MATCH: usize = 18;

	/// Furthest a back-reference can reach
	pub const WINDOW_SIZE: usize = 4096;

	/// Items per control byte
	pub const GROUP_SIZE: usize = 8;
}
