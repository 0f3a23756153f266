//! Extraction settings for [`AssetExtractor`](super::AssetExtractor).
//!
//! # Presets
//!
//! - `default()`: 6 warm-up workers, raw-bytes fallback enabled
//! - `strict()`: 6 warm-up workers, decompression failures are errors
//!
//! # Examples
//!
//! ```
//! use espers_types::asset::ExtractConfig;
//!
//! let config = ExtractConfig::default();
//! assert_eq!(config.concurrency, 6);
//! assert!(config.fallback_to_raw);
//!
//! let config = ExtractConfig::strict().with_concurrency(2);
//! assert!(!config.fallback_to_raw);
//! ```

use serde::{Deserialize, Serialize};

use super::table::PALETTE_BASE;

/// Default number of concurrent palette workers
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Default number of cartridge bytes handed to the decompressor for field graphics
pub const DEFAULT_FIELD_WINDOW: usize = 0x800;

/// Default number of cartridge bytes handed to the decompressor for battle graphics
pub const DEFAULT_BATTLE_WINDOW: usize = 0x400;

/// Configuration for asset extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
	/// Upper bound on workers used by the palette warm-up
	pub concurrency: usize,
	/// Use the raw cartridge bytes when a block fails to decompress
	pub fallback_to_raw: bool,
	/// Bytes read from the cartridge for each field sprite block
	pub field_window: usize,
	/// Bytes read from the cartridge for each battle sprite block
	pub battle_window: usize,
	/// Offset of the first palette record
	pub palette_base: usize,
}

impl Default for ExtractConfig {
	fn default() -> Self {
		Self {
			concurrency: DEFAULT_CONCURRENCY,
			fallback_to_raw: true,
			field_window: DEFAULT_FIELD_WINDOW,
			battle_window: DEFAULT_BATTLE_WINDOW,
			palette_base: PALETTE_BASE,
		}
	}
}

impl ExtractConfig {
	/// Create a configuration that reports decompression failures instead of
	/// substituting raw bytes.
	pub fn strict() -> Self {
		Self {
			fallback_to_raw: false,
			..Self::default()
		}
	}

	/// Set the warm-up worker count. Zero is clamped to one.
	pub fn with_concurrency(mut self, concurrency: usize) -> Self {
		self.concurrency = concurrency.max(1);
		self
	}
}
