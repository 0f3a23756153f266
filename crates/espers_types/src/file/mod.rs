//! Binary format support: cartridge images, block compression and sprite tiles.

mod error;

pub mod lz;
pub mod rom;
pub mod spr;

// Re-export error types
pub use error::{CodecError, DecompressError, PaletteError, RomError};

// Re-export main file types
pub use rom::{CartridgeImage, RegionVariant};
pub use spr::{Color, Color5, Palette, Sprite, SpriteKind};
