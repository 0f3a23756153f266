//! Prelude module for `espers_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use espers_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let palette = Palette::grayscale();
//! let bytes = palette.to_bytes();
//! assert_eq!(Palette::from_bytes(&bytes).unwrap(), palette);
//!
//! // Compression round-trips
//! let packed = lz::compress(&bytes);
//! assert_eq!(lz::decompress(&packed).unwrap(), bytes);
//! ```

// Re-export everything from espers_types::prelude
#[doc(inline)]
pub use espers_types::prelude::*;

// Re-export the entire espers_types module for advanced usage
#[doc(inline)]
pub use espers_types;
