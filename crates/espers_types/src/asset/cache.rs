use std::{collections::HashMap, sync::Arc};

use super::Extraction;
use crate::file::{Palette, Sprite};

/// Cached assets keyed by character id.
#[derive(Debug, Default)]
pub(super) struct AssetCache {
	pub palettes: HashMap<u8, Arc<Palette>>,
	pub field: HashMap<u8, Extraction<Arc<Sprite>>>,
	pub battle: HashMap<u8, Extraction<Arc<Sprite>>>,
	/// Set once a full warm-up has been swapped in
	pub palettes_warm: bool,
}
