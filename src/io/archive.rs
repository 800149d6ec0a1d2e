//! In-memory archive layout, tarball export and folder export

use crate::{
    analysis::{
        metadata::{CollectionManifest, ItemMetadata},
        rarity::RarityReport,
    },
    io::configuration::{COLLECTION_MANIFEST_FILE, IMAGES_DIR, METADATA_DIR, RARITY_REPORT_FILE},
    io::error::{GenerationError, Result},
    model::{
        artifact::GeneratedArtifact,
        options::{CollectionConfig, OutputStructure},
    },
};
use flate2::{Compression, write::GzEncoder};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// One file inside the archive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Slash-separated path relative to the archive root
    pub path: String,
    /// File contents
    pub data: Vec<u8>,
}

/// Ordered in-memory archive of a finished run
///
/// Writing a path that already exists replaces its contents in place, keeping
/// its earlier position.
#[derive(Clone, Debug, Default)]
pub struct CollectionArchive {
    entries: Vec<ArchiveEntry>,
    index: HashMap<String, usize>,
}

impl CollectionArchive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file, returning `true` if an earlier file was overwritten
    pub fn insert(&mut self, path: impl Into<String>, data: Vec<u8>) -> bool {
        let path = path.into();

        if let Some(entry) = self
            .index
            .get(&path)
            .and_then(|&position| self.entries.get_mut(position))
        {
            entry.data = data;
            return true;
        }

        self.index.insert(path.clone(), self.entries.len());
        self.entries.push(ArchiveEntry { path, data });
        false
    }

    /// Contents of the file at `path`
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.index
            .get(path)
            .and_then(|&position| self.entries.get(position))
            .map(|entry| entry.data.as_slice())
    }

    /// Whether a file exists at `path`
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// File paths in insertion order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.path.as_str())
    }

    /// Files in insertion order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive holds no files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as a gzip-compressed tarball
    ///
    /// # Errors
    ///
    /// Returns an error if an entry cannot be appended or compression fails
    pub fn to_tar_gz(&self) -> Result<Vec<u8>> {
        let archive_error = |operation: &'static str| {
            move |e: std::io::Error| GenerationError::FileSystem {
                path: "<archive>".into(),
                operation,
                source: e,
            }
        };

        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for entry in &self.entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(entry.data.len() as u64);
            header.set_mode(0o644);
            header.set_mtime(0);
            builder
                .append_data(&mut header, &entry.path, entry.data.as_slice())
                .map_err(archive_error("append archive entry"))?;
        }

        let encoder = builder
            .into_inner()
            .map_err(archive_error("finish archive"))?;
        encoder.finish().map_err(archive_error("compress archive"))
    }

    /// Materialize the archive as a folder tree under `root`
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file cannot be written
    pub fn write_to_dir(&self, root: &Path) -> Result<()> {
        for entry in &self.entries {
            let target = root.join(&entry.path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| GenerationError::FileSystem {
                    path: parent.to_path_buf(),
                    operation: "create directory",
                    source: e,
                })?;
            }
            std::fs::write(&target, &entry.data).map_err(|e| GenerationError::FileSystem {
                path: target.clone(),
                operation: "write file",
                source: e,
            })?;
        }
        Ok(())
    }
}

/// Lays out one run's outputs into a [`CollectionArchive`]
///
/// Images go in as artifacts arrive. Metadata is held back until the run is
/// finished so a rarity score computed from the final counts can be added.
/// With uniqueness disabled two artifacts can share a DNA; the later one then
/// overwrites the earlier one's files.
pub struct ArchivePackager {
    structure: OutputStructure,
    include_metadata: bool,
    archive: CollectionArchive,
    pending_metadata: Vec<(String, ItemMetadata)>,
    artifacts: usize,
}

impl ArchivePackager {
    /// Create a packager for the given layout
    pub fn new(structure: OutputStructure, include_metadata: bool) -> Self {
        Self {
            structure,
            include_metadata,
            archive: CollectionArchive::new(),
            pending_metadata: Vec::new(),
            artifacts: 0,
        }
    }

    /// Number of artifacts packaged so far
    pub const fn artifact_count(&self) -> usize {
        self.artifacts
    }

    /// Archive path of an artifact's image
    pub fn image_path(&self, stem: &str) -> String {
        self.place(IMAGES_DIR, &format!("{}.png", safe_stem(stem)))
    }

    /// Archive path of an artifact's metadata file
    pub fn metadata_path(&self, stem: &str) -> String {
        self.place(METADATA_DIR, &format!("{}.json", safe_stem(stem)))
    }

    fn place(&self, dir: &str, file_name: &str) -> String {
        match self.structure {
            OutputStructure::Flat => file_name.to_string(),
            OutputStructure::Separated => format!("{dir}/{file_name}"),
        }
    }

    /// Take ownership of one artifact's files
    pub fn add_artifact(&mut self, artifact: GeneratedArtifact) {
        let image_path = self.image_path(artifact.file_stem());
        if self.archive.insert(image_path, artifact.image) {
            tracing::debug!(dna = %artifact.dna, "duplicate DNA overwrote an earlier image");
        }

        let include_metadata = self.include_metadata;
        if let Some(metadata) = artifact.metadata.filter(|_| include_metadata) {
            let path = self.metadata_path(&artifact.dna.formatted);
            self.pending_metadata.push((path, metadata));
        }

        self.artifacts += 1;
    }

    /// Write metadata, the rarity report and the manifest, and return the archive
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Serialization`] if a JSON file cannot be written
    pub fn finish(
        mut self,
        report: &RarityReport,
        collection: &CollectionConfig,
    ) -> Result<CollectionArchive> {
        for (path, metadata) in std::mem::take(&mut self.pending_metadata) {
            let record = if collection.include_rarity {
                metadata.with_rarity_score(report.score(metadata.traits(), self.artifacts))
            } else {
                metadata
            };
            self.archive
                .insert(path, to_pretty_json(&record, "item metadata")?);
        }

        self.archive
            .insert(RARITY_REPORT_FILE, to_pretty_json(report, "rarity report")?);

        if self.structure == OutputStructure::Separated {
            let manifest = CollectionManifest::new(collection, self.artifacts);
            self.archive.insert(
                COLLECTION_MANIFEST_FILE,
                to_pretty_json(&manifest, "collection manifest")?,
            );
        }

        Ok(self.archive)
    }
}

/// Escape path separators so distinct stems stay distinct file names
fn safe_stem(stem: &str) -> String {
    let mut escaped = String::with_capacity(stem.len());
    for c in stem.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '/' => escaped.push_str("%2F"),
            '\\' => escaped.push_str("%5C"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T, what: &'static str) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|e| GenerationError::Serialization { what, source: e })
}
