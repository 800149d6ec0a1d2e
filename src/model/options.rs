//! Run-level options and collection settings

use crate::io::configuration::{
    COLLECTOR_EDITION, COLLECTOR_HEIGHT, COLLECTOR_WIDTH, DEFAULT_COLLECTION_DESCRIPTION,
    DEFAULT_COLLECTION_NAME, DEFAULT_COLLECTION_SIZE, DEFAULT_HEIGHT, DEFAULT_IMAGE_TIMEOUT_MS,
    DEFAULT_MAX_RESAMPLE_ATTEMPTS, DEFAULT_WIDTH, PREVIEW_CAP, STANDARD_EDITION,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Directory layout of the produced archive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStructure {
    /// Images and metadata side by side at the archive root
    #[default]
    Flat,
    /// Images under `images/`, metadata under `metadata/`, plus a collection manifest
    Separated,
}

/// Configuration for a single generation run
///
/// Supplied once per run and never changed while it executes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
// Mirrors the option set the caller exposes as independent toggles
#[allow(clippy::struct_excessive_bools)]
pub struct GenerationOptions {
    /// Requested output width in pixels
    pub width: u32,
    /// Requested output height in pixels
    pub height: u32,
    /// Requested number of artifacts
    #[serde(rename = "numberOfNFTs", alias = "numberOfItems")]
    pub number_of_items: usize,
    /// Whether per-item metadata files are written
    pub include_metadata: bool,
    /// Whether the run is capped at [`PREVIEW_CAP`] artifacts
    pub preview_mode: bool,
    /// Whether duplicate combinations are rejected and resampled
    pub enforce_uniqueness: bool,
    /// Archive layout
    pub output_structure: OutputStructure,
    /// Whether the draw order of layers is shuffled per artifact
    pub randomize_layer_order: bool,
    /// Whether the fixed collector resolution replaces `width` and `height`
    pub edition_mode: bool,
    /// Sampling attempts allowed per artifact before giving up
    pub max_resample_attempts: usize,
    /// Time allowed to resolve one layer image, in milliseconds
    pub image_timeout_ms: u64,
    /// Seed for reproducible runs; a random one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            number_of_items: DEFAULT_COLLECTION_SIZE,
            include_metadata: true,
            preview_mode: false,
            enforce_uniqueness: true,
            output_structure: OutputStructure::Flat,
            randomize_layer_order: false,
            edition_mode: false,
            max_resample_attempts: DEFAULT_MAX_RESAMPLE_ATTEMPTS,
            image_timeout_ms: DEFAULT_IMAGE_TIMEOUT_MS,
            seed: None,
        }
    }
}

impl GenerationOptions {
    /// Output resolution after the edition override
    pub const fn effective_dimensions(&self) -> (u32, u32) {
        if self.edition_mode {
            (COLLECTOR_WIDTH, COLLECTOR_HEIGHT)
        } else {
            (self.width, self.height)
        }
    }

    /// Number of artifacts the run will actually produce
    pub fn effective_count(&self) -> usize {
        if self.preview_mode {
            PREVIEW_CAP.min(self.number_of_items)
        } else {
            self.number_of_items
        }
    }

    /// Edition label written into metadata
    pub const fn edition_label(&self) -> &'static str {
        if self.edition_mode {
            COLLECTOR_EDITION
        } else {
            STANDARD_EDITION
        }
    }

    /// Image resolution time limit
    pub const fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms)
    }
}

/// Collection-level settings written into metadata and the manifest
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionConfig {
    /// Collection name
    pub name: String,
    /// Description copied into every metadata record
    pub description: String,
    /// Whether a rarity score attribute is appended to metadata
    pub include_rarity: bool,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COLLECTION_NAME.to_string(),
            description: DEFAULT_COLLECTION_DESCRIPTION.to_string(),
            include_rarity: true,
        }
    }
}

impl CollectionConfig {
    /// File-name friendly form of the collection name
    pub fn slug(&self) -> String {
        let slug: String = self
            .name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase()
            .chars()
            .filter(|ch| ch.is_alphanumeric() || *ch == '-' || *ch == '_')
            .collect();
        if slug.is_empty() {
            "collection".to_string()
        } else {
            slug
        }
    }
}
