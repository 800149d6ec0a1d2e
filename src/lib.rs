//! Generative collection engine that stacks weighted layer images into unique artifacts
//!
//! Each artifact samples one item per layer, is identified by the DNA of its
//! chosen items, and is composited into a PNG with an optional metadata record.
//! A finished run is packaged, together with attribute rarity counts, into a
//! single archive.

#![forbid(unsafe_code)]

/// Sampling, DNA encoding, uniqueness tracking and run orchestration
pub mod algorithm;
/// Metadata synthesis and rarity aggregation
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Layer definitions, run options and generated artifacts
pub mod model;
/// Image loading, caching and layer compositing
pub mod render;

pub use algorithm::executor::{GenerationExecutor, GenerationOutput, generate_collection};
pub use io::error::{GenerationError, Result};
pub use model::layer::{ImageSource, Layer, LayerItem, LayerKind};
pub use model::options::{CollectionConfig, GenerationOptions, OutputStructure};
