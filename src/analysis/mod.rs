//! Analysis of generated artifacts for metadata and rarity reporting

/// Per-item metadata records and the collection manifest
pub mod metadata;
/// Attribute frequency tracking and rarity scoring
pub mod rarity;
