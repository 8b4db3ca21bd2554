//! Ergonomic wrappers over `mapcmp-core` that accept `image::GrayImage`
//! inputs.
//!
//! This crate is organized into a few focused modules:
//! - [`image`] – categorical rasters from 8-bit grayscale images and back.
//! - [`app`] – configuration loading and the comparison/transform runs
//!   shared by the CLI and examples.
//! - [`logger`] – a small `tracing` subscriber setup used by the CLI.

pub mod app;
pub mod image;
pub mod logger;

// Re-export the core so downstream users need a single dependency.
// Consumers that want the raw scan primitives are encouraged to depend on
// `mapcmp-core` directly.
pub use mapcmp_core::*;

pub use crate::image::{
    distance_transform_image, fuzzy_kappa_image, gray_from_comparison, raster_from_gray,
};
