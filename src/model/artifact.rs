use crate::{algorithm::dna::Dna, analysis::metadata::ItemMetadata};

/// One finished output of a run
///
/// Created by a single executor step and handed to the packager untouched.
#[derive(Clone, Debug)]
pub struct GeneratedArtifact {
    /// Zero-based position in the run
    pub index: usize,
    /// Identity of the combination
    pub dna: Dna,
    /// PNG-encoded image
    pub image: Vec<u8>,
    /// Metadata record, when metadata is enabled
    pub metadata: Option<ItemMetadata>,
}

impl GeneratedArtifact {
    /// File stem shared by the artifact's image and metadata files
    pub fn file_stem(&self) -> &str {
        &self.dna.formatted
    }
}
