#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `espers-rs` pulls character sprites and palettes out of a 16-bit era RPG
//! cartridge image, turns arbitrary images into tile-packed sprites and plays
//! frame sequences back.
//!
pub use espers_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use espers_dylib;
