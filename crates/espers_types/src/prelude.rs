//! Prelude module for `espers_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```
//! use espers_types::prelude::*;
//!
//! let palette = Palette::grayscale();
//! let sprite = Sprite::new(SpriteKind::Overworld, 1, vec![0x11; 128], palette).unwrap();
//! let image = codec::decode(&sprite).unwrap();
//! assert_eq!(image.dimensions(), (16, 16));
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	CartridgeImage,
	CodecError,
	Color,
	Color5,
	DecompressError,
	Palette,
	PaletteError,
	RegionVariant,
	RomError,
	Sprite,
	SpriteKind,
};

// Codec and compression entry points
#[doc(inline)]
pub use crate::file::{lz, spr::codec};

// Import pipeline
#[doc(inline)]
pub use crate::color::{DitherMode, ImportOptions, import_image};

// Cartridge assets
#[doc(inline)]
pub use crate::asset::{AssetExtractor, ExtractConfig, ExtractError, Extraction};

// Playback
#[doc(inline)]
pub use crate::anim::{
	AnimationController,
	AnimationError,
	AnimationSequence,
	Direction,
	PlaybackEvent,
	PlaybackMode,
	PlaybackObserver,
	PlaybackState,
};

// Re-export the modules for advanced usage
#[doc(inline)]
pub use crate::{anim, asset, color, file};
