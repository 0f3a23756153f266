//! Cartridge image loading and validation.
//!
//! A cartridge image is the raw byte dump of the game program and its assets.
//! Dumps produced by old copier devices carry an extra 512-byte header in front
//! of the real data; it is detected by size and stripped on load.
//!
//! # Layout
//!
//! ```text
//! [optional 512-byte copier header]
//! 0x000000  program/asset data
//! 0x007FC0  21-byte internal title (LoROM mapping)
//! 0x00FFC0  21-byte internal title (HiROM mapping)
//! ...       total 3 MiB or 4 MiB
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use espers_types::file::rom::CartridgeImage;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rom = CartridgeImage::load("ff3.smc")?;
//! println!("{} ({}), header: {}", rom.title(), rom.region(), rom.has_header());
//!
//! let bytes = rom.read_bytes(0x268000, 32)?;
//! assert_eq!(bytes.len(), 32);
//! # Ok(())
//! # }
//! ```

use std::{
	fmt,
	path::{Path, PathBuf},
};

use log::{debug, info};

use crate::file::RomError;

/// Cartridge constants.
pub mod constants {
	/// Size of a legacy copier header
	pub const COPIER_HEADER_SIZE: usize = 512;

	/// One mebibyte
	pub const MIB: usize = 1024 * 1024;

	/// Accepted image sizes after header strip
	pub const VALID_SIZES: [usize; 2] = [3 * MIB, 4 * MIB];

	/// Title offset for the LoROM memory map
	pub const LOROM_TITLE_OFFSET: usize = 0x7FC0;

	/// Title offset for the HiROM memory map
	pub const HIROM_TITLE_OFFSET: usize = 0xFFC0;

	/// Length of the internal title field
	pub const TITLE_LENGTH: usize = 21;

	/// Title substrings identifying a supported cartridge
	pub const KNOWN_TITLES: [&str; 3] = ["FINAL FANTASY", "FF3", "FF6"];

	/// File names tried, in order, by [`super::CartridgeImage::discover`]
	pub const CONVENTIONAL_NAMES: [&str; 8] = [
		"ff3.smc",
		"ff3.sfc",
		"ff6.smc",
		"ff6.sfc",
		"Final Fantasy III (USA).sfc",
		"Final Fantasy III (USA).smc",
		"Final Fantasy VI (Japan).sfc",
		"rom.smc",
	];
}

/// Regional release detected from the internal title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegionVariant {
	/// Not classified
	#[default]
	Unknown,
	/// North American release
	Usa,
	/// Japanese release
	Japan,
	/// European release, also the fallback for recognized but ambiguous titles
	Europe,
}

impl RegionVariant {
	/// Classifies a normalized (upper-cased, trimmed) title.
	///
	/// A `III`/`3` token means the USA release; a bare `VI`/`6` token means
	/// Japan. Anything else that was recognized falls back to Europe.
	pub fn classify(title: &str) -> Self {
		if title.contains("III") || title.contains('3') {
			Self::Usa
		} else if title.contains("VI") || title.contains('6') {
			Self::Japan
		} else {
			Self::Europe
		}
	}
}

impl fmt::Display for RegionVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unknown => write!(f, "Unknown"),
			Self::Usa => write!(f, "USA"),
			Self::Japan => write!(f, "Japan"),
			Self::Europe => write!(f, "Europe"),
		}
	}
}

/// A validated, read-only cartridge image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeImage {
	/// Image bytes with any copier header removed
	data: Vec<u8>,

	/// Normalized internal title
	title: String,

	/// Detected region
	region: RegionVariant,

	/// Whether a copier header was stripped
	has_header: bool,
}

impl CartridgeImage {
	/// Loads and validates a cartridge image from disk.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The file cannot be read
	/// - The size (after header strip) is not 3 MiB or 4 MiB
	/// - No known title is found at either header location
	pub fn load(path: impl AsRef<Path>) -> Result<Self, RomError> {
		let path = path.as_ref();
		let data = std::fs::read(path)?;
		debug!("Read {} bytes from {}", data.len(), path.display());
		Self::from_bytes(data)
	}

	/// Validates an in-memory cartridge image.
	///
	/// # Errors
	///
	/// Same validation failures as [`CartridgeImage::load`], minus IO.
	pub fn from_bytes(mut data: Vec<u8>) -> Result<Self, RomError> {
		let has_header = data.len() % 1024 == constants::COPIER_HEADER_SIZE;
		if has_header {
			data.drain(..constants::COPIER_HEADER_SIZE);
		}

		if !constants::VALID_SIZES.contains(&data.len()) {
			return Err(RomError::InvalidSize {
				actual: data.len(),
			});
		}

		let mut last_title = String::new();
		for offset in [constants::LOROM_TITLE_OFFSET, constants::HIROM_TITLE_OFFSET] {
			let title = read_title(&data, offset);
			if is_known_title(&title) {
				let region = RegionVariant::classify(&title);
				info!("Recognized cartridge {title:?} at 0x{offset:04X}, region {region}");
				return Ok(Self {
					data,
					title,
					region,
					has_header,
				});
			}
			last_title = title;
		}

		Err(RomError::UnrecognizedImage {
			title: last_title,
		})
	}

	/// Tries each conventional file name in each directory, in order, and
	/// returns the first image that loads.
	///
	/// # Errors
	///
	/// Returns [`RomError::NotFound`] listing every attempted path when none loads.
	pub fn discover<P: AsRef<Path>>(dirs: &[P]) -> Result<Self, RomError> {
		let mut searched = Vec::new();
		for dir in dirs {
			for name in constants::CONVENTIONAL_NAMES {
				let candidate = dir.as_ref().join(name);
				if candidate.is_file() {
					match Self::load(&candidate) {
						Ok(image) => return Ok(image),
						Err(e) => debug!("Skipping {}: {e}", candidate.display()),
					}
				}
				searched.push(candidate);
			}
		}

		Err(RomError::NotFound {
			searched,
		})
	}

	/// Returns a bounds-checked view of `length` bytes starting at `offset`.
	///
	/// # Errors
	///
	/// Returns [`RomError::OutOfBounds`] if the range leaves the image.
	pub fn read_bytes(&self, offset: usize, length: usize) -> Result<&[u8], RomError> {
		offset
			.checked_add(length)
			.filter(|&end| end <= self.data.len())
			.map(|end| &self.data[offset..end])
			.ok_or(RomError::OutOfBounds {
				offset,
				length,
				size: self.data.len(),
			})
	}

	/// Returns at most `length` bytes starting at `offset`, truncated at the end
	/// of the image.
	///
	/// # Errors
	///
	/// Returns [`RomError::OutOfBounds`] only if `offset` itself is past the end.
	pub fn read_window(&self, offset: usize, length: usize) -> Result<&[u8], RomError> {
		if offset >= self.data.len() {
			return Err(RomError::OutOfBounds {
				offset,
				length,
				size: self.data.len(),
			});
		}
		let end = offset.saturating_add(length).min(self.data.len());
		Ok(&self.data[offset..end])
	}

	/// Reads a single byte.
	pub fn read_u8(&self, offset: usize) -> Result<u8, RomError> {
		Ok(self.read_bytes(offset, 1)?[0])
	}

	/// Reads a little-endian 16-bit word.
	pub fn read_u16_le(&self, offset: usize) -> Result<u16, RomError> {
		let bytes = self.read_bytes(offset, 2)?;
		Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
	}

	/// Returns the normalized internal title.
	pub fn title(&self) -> &str {
		&self.title
	}

	/// Returns the detected region.
	pub fn region(&self) -> RegionVariant {
		self.region
	}

	/// Returns `true` if a copier header was stripped on load.
	pub fn has_header(&self) -> bool {
		self.has_header
	}

	/// Returns the image size in bytes (header excluded).
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Always `false` for a validated image.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Returns the whole image.
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}
}

impl fmt::Display for CartridgeImage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Cartridge {:?}: {} bytes, region {}, copier header: {}",
			self.title,
			self.data.len(),
			self.region,
			self.has_header
		)
	}
}

/// Reads, decodes and normalizes the title field at `offset`.
fn read_title(data: &[u8], offset: usize) -> String {
	let Some(raw) = data.get(offset..offset + constants::TITLE_LENGTH) else {
		return String::new();
	};
	// Japanese dumps use half-width katakana in the title field
	let (decoded, _, _) = encoding_rs::SHIFT_JIS.decode(raw);
	decoded.trim_end_matches(['\0', ' ']).to_uppercase()
}

fn is_known_title(title: &str) -> bool {
	!title.is_empty() && constants::KNOWN_TITLES.iter().any(|known| title.contains(known))
}

/// Builds the search list used by [`CartridgeImage::discover`] for a single directory.
pub fn candidate_paths(dir: impl AsRef<Path>) -> Vec<PathBuf> {
	constants::CONVENTIONAL_NAMES.iter().map(|name| dir.as_ref().join(name)).collect()
}
