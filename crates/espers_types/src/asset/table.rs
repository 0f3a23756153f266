//! Fixed cartridge locations of the playable characters' graphics.
//!
//! Field graphics, battle graphics and palettes each live in one table with a
//! constant stride per character:
//!
//! ```text
//! field   0x150000 + id * 0x16A0   8 frames of 16×24, block-compressed
//! battle  0x2A0000 + id * 0x0400   1 frame of 32×32, block-compressed
//! palette 0x268000 + id * 0x0020   16 × 5-5-5 words, uncompressed
//! ```

use crate::file::spr::{SpriteKind, frame_bytes};

/// Start of the field graphics table
pub const FIELD_GFX_BASE: usize = 0x15_0000;

/// Distance between consecutive characters' field graphics
pub const FIELD_GFX_STRIDE: usize = 0x16A0;

/// Frames in a field sprite set
pub const FIELD_FRAME_COUNT: usize = 8;

/// Start of the battle graphics table
pub const BATTLE_GFX_BASE: usize = 0x2A_0000;

/// Distance between consecutive characters' battle graphics
pub const BATTLE_GFX_STRIDE: usize = 0x400;

/// Frames in a battle sprite
pub const BATTLE_FRAME_COUNT: usize = 1;

/// Start of the character palette table
pub const PALETTE_BASE: usize = 0x26_8000;

/// Distance between consecutive palettes
pub const PALETTE_STRIDE: usize = 0x20;

/// Decompressed size of a field sprite set
pub const FIELD_SIZE: usize = {
	let (w, h) = SpriteKind::Character.canonical_size();
	frame_bytes(w, h) * FIELD_FRAME_COUNT
};

/// Decompressed size of a battle sprite
pub const BATTLE_SIZE: usize = {
	let (w, h) = SpriteKind::Battle.canonical_size();
	frame_bytes(w, h) * BATTLE_FRAME_COUNT
};

/// A playable character and the location of its assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Character {
	/// Character id (0-13)
	pub id: u8,
	/// Display name
	pub name: &'static str,
}

impl Character {
	/// Offset of the compressed field graphics.
	pub const fn field_offset(&self) -> usize {
		FIELD_GFX_BASE + self.id as usize * FIELD_GFX_STRIDE
	}

	/// Offset of the compressed battle graphics.
	pub const fn battle_offset(&self) -> usize {
		BATTLE_GFX_BASE + self.id as usize * BATTLE_GFX_STRIDE
	}

	/// Offset of the palette record.
	pub const fn palette_offset(&self) -> usize {
		self.palette_offset_from(PALETTE_BASE)
	}

	/// Offset of the palette record in a table starting at `base`.
	pub const fn palette_offset_from(&self, base: usize) -> usize {
		base + self.id as usize * PALETTE_STRIDE
	}
}

/// Every known character, indexed by id.
pub static CHARACTERS: [Character; 14] = [
	Character {
		id: 0,
		name: "Terra",
	},
	Character {
		id: 1,
		name: "Locke",
	},
	Character {
		id: 2,
		name: "Cyan",
	},
	Character {
		id: 3,
		name: "Shadow",
	},
	Character {
		id: 4,
		name: "Edgar",
	},
	Character {
		id: 5,
		name: "Sabin",
	},
	Character {
		id: 6,
		name: "Celes",
	},
	Character {
		id: 7,
		name: "Strago",
	},
	Character {
		id: 8,
		name: "Relm",
	},
	Character {
		id: 9,
		name: "Setzer",
	},
	Character {
		id: 10,
		name: "Mog",
	},
	Character {
		id: 11,
		name: "Gau",
	},
	Character {
		id: 12,
		name: "Gogo",
	},
	Character {
		id: 13,
		name: "Umaro",
	},
];

/// Looks up a character by id.
pub fn character(id: u8) -> Option<&'static Character> {
	CHARACTERS.get(id as usize)
}
