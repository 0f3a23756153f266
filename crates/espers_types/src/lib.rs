//! This crate provides the core types of the `espers-rs` sprite pipeline.
//!
//! # Modules
//!
//! - **`file`**: Cartridge image loading, block compression, palettes and the 4bpp tile codec
//! - **`color`**: Palette extraction, quantization and dithering for imported images
//! - **`asset`**: Character graphics and palettes read from a cartridge, with a warm cache
//! - **`anim`**: Frame sequences and a playback controller
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use espers_types::prelude::*;
//!
//! let rom = Arc::new(CartridgeImage::load("ff3.smc")?);
//! let extractor = AssetExtractor::new(rom);
//! let sprite = extractor.field_sprite_cached(0)?.value;
//! let frames = codec::decode_all(&sprite)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use espers_types::file::{CartridgeImage, lz};
//!
//! let rom = CartridgeImage::load("ff3.smc")?;
//! let block = lz::decompress(rom.read_window(0x15_0000, 0x800)?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod anim;
pub mod asset;
pub mod color;
pub mod file;

/// `use espers_types::prelude::*;` to import commonly used items.
pub mod prelude;
