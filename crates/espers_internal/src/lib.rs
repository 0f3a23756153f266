//! This module is separated into its own crate to enable simple dynamic linking for `espers`, and should not be used directly.

/// `use espers::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export espers_types for convenience
pub use espers_types;

// Re-export commonly used types at crate root
pub use espers_types::{
	anim::{AnimationController, AnimationSequence, PlaybackMode},
	asset::{AssetExtractor, ExtractConfig},
	file::{CartridgeImage, Palette, Sprite, SpriteKind},
};
