/// In-memory archive layout and export
pub mod archive;
/// Command-line interface and run driver
pub mod cli;
/// Defaults, limits and file names shared across the crate
pub mod configuration;
/// Error types for generation and image resolution
pub mod error;
/// Tracing subscriber setup
pub mod logging;
/// Layer manifests and layer folder scanning
pub mod manifest;
/// Progress bar display
pub mod progress;
