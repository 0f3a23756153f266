//! Error types for asset extraction.

use thiserror::Error;

use crate::file::{CodecError, DecompressError, PaletteError, RomError};

/// Errors that can occur when extracting assets from a cartridge image
#[derive(Debug, Error)]
pub enum ExtractError {
	/// No character with this id exists in the table
	#[error("Unknown character id {0} (valid ids are 0-13)")]
	UnknownCharacter(u8),

	/// Cartridge read failed
	#[error(transparent)]
	Rom(#[from] RomError),

	/// Block failed to decompress and raw fallback is disabled
	#[error("Failed to decompress block at 0x{offset:06X}: {source}")]
	Decompress {
		/// Cartridge offset of the block
		offset: usize,
		/// Underlying decompression error
		#[source]
		source: DecompressError,
	},

	/// Palette record could not be parsed
	#[error(transparent)]
	Palette(#[from] PaletteError),

	/// Extracted bytes did not form a valid sprite
	#[error(transparent)]
	Codec(#[from] CodecError),

	/// Every palette in the warm-up failed
	#[error("All {attempted} palette extractions failed")]
	AllFailed {
		/// Number of palettes attempted
		attempted: usize,
	},

	/// The warm-up worker pool could not be created
	#[error(transparent)]
	ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
