//! Forces dynamic linking of `espers_internal` when the `dynamic_linking` feature is enabled.
//!
//! This crate only exists to be built as a `dylib`; it should not be used directly.

#[allow(unused_imports)]
#[allow(clippy::single_component_path_imports)]
use espers_internal;
