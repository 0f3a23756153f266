//! Character graphics and palettes pulled from a validated cartridge image.
//!
//! [`AssetExtractor`] reads the fixed character tables described in [`table`],
//! decompresses sprite blocks and keeps a warm cache of palettes and sprites.
//! Blocks that fail to decompress fall back to the raw cartridge bytes unless
//! the extractor was built with [`ExtractConfig::strict`].
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use espers_types::asset::AssetExtractor;
//! use espers_types::file::CartridgeImage;
//!
//! let rom = Arc::new(CartridgeImage::load("ff3.smc")?);
//! let extractor = AssetExtractor::new(rom);
//! extractor.load_all_palettes_cached()?;
//!
//! let terra = extractor.field_sprite_cached(0)?;
//! if terra.used_fallback {
//!     eprintln!("Terra's graphics are raw cartridge bytes");
//! }
//! println!("{}", terra.value);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{
	collections::HashMap,
	sync::{Arc, PoisonError, RwLock},
};

use log::{debug, info, warn};

use crate::file::{CartridgeImage, Palette, Sprite, SpriteKind, lz};

mod cache;
mod config;
mod error;
pub mod table;

pub use config::ExtractConfig;
pub use error::ExtractError;
pub use table::{CHARACTERS, Character};

use cache::AssetCache;

/// A value produced by extraction, flagged when raw bytes stood in for a
/// block that failed to decompress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<T> {
	/// Extracted value
	pub value: T,
	/// True when the raw-bytes fallback was taken
	pub used_fallback: bool,
}

impl<T> Extraction<T> {
	/// Transforms the value, keeping the fallback flag.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extraction<U> {
		Extraction {
			value: f(self.value),
			used_fallback: self.used_fallback,
		}
	}
}

/// Outcome of a palette warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WarmupReport {
	/// Palettes read from the cartridge
	pub loaded: usize,
	/// Palettes replaced by the grayscale fallback
	pub failed: usize,
	/// True when the cache was already warm and nothing ran
	pub skipped: bool,
}

/// Extracts character assets from a cartridge image.
///
/// All methods take `&self`; the cache sits behind a lock so one extractor
/// can be shared between threads.
#[derive(Debug)]
pub struct AssetExtractor {
	rom: Arc<CartridgeImage>,
	config: ExtractConfig,
	cache: RwLock<AssetCache>,
}

impl AssetExtractor {
	/// Creates an extractor with the default configuration.
	pub fn new(rom: Arc<CartridgeImage>) -> Self {
		Self::with_config(rom, ExtractConfig::default())
	}

	/// Creates an extractor with a custom configuration.
	pub fn with_config(rom: Arc<CartridgeImage>, config: ExtractConfig) -> Self {
		Self {
			rom,
			config,
			cache: RwLock::new(AssetCache::default()),
		}
	}

	/// Returns the cartridge image.
	pub fn rom(&self) -> &CartridgeImage {
		&self.rom
	}

	/// Returns the configuration.
	pub fn config(&self) -> &ExtractConfig {
		&self.config
	}

	/// Returns the table of known characters.
	pub fn character_table(&self) -> &'static [Character] {
		&CHARACTERS
	}

	fn character(&self, id: u8) -> Result<&'static Character, ExtractError> {
		table::character(id).ok_or(ExtractError::UnknownCharacter(id))
	}

	/// Reads a character's palette straight from the cartridge.
	///
	/// # Errors
	///
	/// Returns an error if the id is unknown or the record lies outside the image.
	pub fn extract_palette(&self, id: u8) -> Result<Palette, ExtractError> {
		let character = self.character(id)?;
		let offset = character.palette_offset_from(self.config.palette_base);
		let bytes = self.rom.read_bytes(offset, Palette::BYTE_SIZE)?;
		Ok(Palette::from_bytes(bytes)?)
	}

	/// Extracts a character's field sprite set (eight 16×24 frames).
	///
	/// # Errors
	///
	/// Returns an error if the id is unknown, the block cannot be read, or the
	/// block fails to decompress while raw fallback is disabled.
	pub fn extract_field_sprite(&self, id: u8) -> Result<Extraction<Sprite>, ExtractError> {
		let character = self.character(id)?;
		let block = self.read_block(character.field_offset(), self.config.field_window, table::FIELD_SIZE)?;
		let palette = self.palette_cached(id)?;
		let used_fallback = block.used_fallback;
		let sprite = Sprite::with_shared_palette(
			SpriteKind::Character,
			table::FIELD_FRAME_COUNT,
			block.value,
			palette,
		)?;
		Ok(Extraction {
			value: sprite.with_id(u32::from(id)).with_name(character.name),
			used_fallback,
		})
	}

	/// Extracts a character's battle sprite (one 32×32 frame).
	///
	/// # Errors
	///
	/// Same failure modes as [`AssetExtractor::extract_field_sprite`].
	pub fn extract_battle_sprite(&self, id: u8) -> Result<Extraction<Sprite>, ExtractError> {
		let character = self.character(id)?;
		let block = self.read_block(character.battle_offset(), self.config.battle_window, table::BATTLE_SIZE)?;
		let palette = self.palette_cached(id)?;
		let used_fallback = block.used_fallback;
		let sprite = Sprite::with_shared_palette(
			SpriteKind::Battle,
			table::BATTLE_FRAME_COUNT,
			block.value,
			palette,
		)?;
		Ok(Extraction {
			value: sprite.with_id(u32::from(id)).with_name(character.name),
			used_fallback,
		})
	}

	/// Decompresses the block at `offset`, reading at most `window` bytes, and
	/// sizes the result to exactly `expected` bytes.
	///
	/// Short output is zero-padded and long output truncated.
	///
	/// # Errors
	///
	/// Returns an error if `offset` lies outside the image, or if the block is
	/// malformed and raw fallback is disabled.
	pub fn read_block(
		&self,
		offset: usize,
		window: usize,
		expected: usize,
	) -> Result<Extraction<Vec<u8>>, ExtractError> {
		let raw = self.rom.read_window(offset, window)?;
		let (mut data, used_fallback) = match lz::decompress(raw) {
			Ok(data) => (data, false),
			Err(source) if self.config.fallback_to_raw => {
				warn!("Block at 0x{offset:06X} failed to decompress ({source}), using raw bytes");
				(raw.to_vec(), true)
			}
			Err(source) => {
				return Err(ExtractError::Decompress {
					offset,
					source,
				});
			}
		};

		if data.len() != expected {
			debug!("Block at 0x{offset:06X} sized {} bytes, adjusting to {expected}", data.len());
			data.resize(expected, 0);
		}

		Ok(Extraction {
			value: data,
			used_fallback,
		})
	}

	/// Loads every character palette into the cache using a bounded worker pool.
	///
	/// Palettes that fail to load are replaced by [`Palette::grayscale`] and
	/// logged. The cache is swapped in as a whole once every worker has
	/// reported. Calling this while the cache is already warm does nothing.
	///
	/// # Errors
	///
	/// Returns [`ExtractError::AllFailed`] if no palette could be read, leaving
	/// the cache cold, or an error if the worker pool cannot be created.
	pub fn load_all_palettes_cached(&self) -> Result<WarmupReport, ExtractError> {
		if self.is_warm() {
			debug!("Palette cache already warm, skipping");
			return Ok(WarmupReport {
				skipped: true,
				..WarmupReport::default()
			});
		}

		let pool = rayon::ThreadPoolBuilder::new()
			.num_threads(self.config.concurrency.max(1))
			.thread_name(|i| format!("palette-worker-{i}"))
			.build()?;

		let (tx, rx) = crossbeam_channel::unbounded();
		pool.scope(|scope| {
			for character in &CHARACTERS {
				let tx = tx.clone();
				scope.spawn(move |_| {
					// The receiver outlives the scope
					let _ = tx.send((character.id, self.extract_palette(character.id)));
				});
			}
		});
		drop(tx);

		let mut palettes = HashMap::with_capacity(CHARACTERS.len());
		let mut report = WarmupReport::default();
		for (id, result) in rx {
			match result {
				Ok(palette) => {
					report.loaded += 1;
					palettes.insert(id, Arc::new(palette));
				}
				Err(e) => {
					warn!("Palette for character {id} failed: {e}, using grayscale");
					report.failed += 1;
					palettes.insert(id, Arc::new(Palette::grayscale()));
				}
			}
		}

		if report.loaded == 0 {
			return Err(ExtractError::AllFailed {
				attempted: CHARACTERS.len(),
			});
		}

		let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
		if cache.palettes_warm {
			return Ok(WarmupReport {
				skipped: true,
				..WarmupReport::default()
			});
		}
		cache.palettes = palettes;
		cache.palettes_warm = true;
		info!(
			"Palette cache warm: {} loaded, {} fallback",
			report.loaded, report.failed
		);
		Ok(report)
	}

	/// Returns a character's palette, reading and caching it on a miss.
	///
	/// A palette that cannot be read is cached as [`Palette::grayscale`].
	///
	/// # Errors
	///
	/// Returns an error only if the id is unknown.
	pub fn palette_cached(&self, id: u8) -> Result<Arc<Palette>, ExtractError> {
		self.character(id)?;
		if let Some(palette) = self.read_cache().palettes.get(&id) {
			return Ok(Arc::clone(palette));
		}

		let palette = match self.extract_palette(id) {
			Ok(palette) => palette,
			Err(e) => {
				warn!("Palette for character {id} failed: {e}, using grayscale");
				Palette::grayscale()
			}
		};
		let mut cache = self.write_cache();
		Ok(Arc::clone(cache.palettes.entry(id).or_insert_with(|| Arc::new(palette))))
	}

	/// Returns a character's field sprite set, extracting it on a miss.
	///
	/// The fallback flag is cached with the sprite, so every hit reports how
	/// the sprite was first produced.
	///
	/// # Errors
	///
	/// Same failure modes as [`AssetExtractor::extract_field_sprite`].
	pub fn field_sprite_cached(&self, id: u8) -> Result<Extraction<Arc<Sprite>>, ExtractError> {
		if let Some(sprite) = self.read_cache().field.get(&id) {
			return Ok(sprite.clone());
		}
		let sprite = self.extract_field_sprite(id)?.map(Arc::new);
		let mut cache = self.write_cache();
		Ok(cache.field.entry(id).or_insert(sprite).clone())
	}

	/// Returns a character's battle sprite, extracting it on a miss.
	///
	/// # Errors
	///
	/// Same failure modes as [`AssetExtractor::extract_battle_sprite`].
	pub fn battle_sprite_cached(&self, id: u8) -> Result<Extraction<Arc<Sprite>>, ExtractError> {
		if let Some(sprite) = self.read_cache().battle.get(&id) {
			return Ok(sprite.clone());
		}
		let sprite = self.extract_battle_sprite(id)?.map(Arc::new);
		let mut cache = self.write_cache();
		Ok(cache.battle.entry(id).or_insert(sprite).clone())
	}

	/// Whether the palette warm-up has completed.
	pub fn is_warm(&self) -> bool {
		self.read_cache().palettes_warm
	}

	/// Number of palettes currently cached.
	pub fn cached_palette_count(&self) -> usize {
		self.read_cache().palettes.len()
	}

	/// Drops every cached palette and sprite.
	pub fn clear_cache(&self) {
		*self.write_cache() = AssetCache::default();
		debug!("Asset cache cleared");
	}

	fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, AssetCache> {
		self.cache.read().unwrap_or_else(PoisonError::into_inner)
	}

	fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, AssetCache> {
		self.cache.write().unwrap_or_else(PoisonError::into_inner)
	}
}
