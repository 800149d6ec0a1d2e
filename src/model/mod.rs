//! Plain data passed between the stages of a run

/// Finished artifacts handed to the packager
pub mod artifact;
/// Layers, items and image sources
pub mod layer;
/// Run options and collection settings
pub mod options;
