//! Tests for archive layout, packaging and export

#[cfg(test)]
mod tests {
    use flate2::read::GzDecoder;
    use layerforge::algorithm::dna::Dna;
    use layerforge::analysis::metadata::{ItemMetadata, TraitAttribute, TraitValue};
    use layerforge::analysis::rarity::RarityReport;
    use layerforge::io::archive::{ArchivePackager, CollectionArchive};
    use layerforge::model::artifact::GeneratedArtifact;
    use layerforge::model::options::{CollectionConfig, OutputStructure};
    use std::io::Read;

    fn artifact(index: usize, formatted: &str, with_metadata: bool) -> GeneratedArtifact {
        let dna = Dna {
            raw: formatted.replace('-', ""),
            formatted: formatted.to_string(),
        };
        let metadata = with_metadata.then(|| ItemMetadata {
            name: dna.formatted.clone(),
            description: "test".to_string(),
            image: "ipfs://TO_BE_FILLED".to_string(),
            dna: dna.formatted.clone(),
            raw_dna: dna.raw.clone(),
            edition: "Standard".to_string(),
            attributes: vec![TraitAttribute {
                trait_type: "Body".to_string(),
                value: TraitValue::Text("0001".to_string()),
            }],
        });

        GeneratedArtifact {
            index,
            dna,
            image: vec![index as u8; 3],
            metadata,
        }
    }

    // Tests flat layout places everything at the root
    // Verified by prefixing flat paths with folders
    #[test]
    fn test_flat_layout() {
        let mut packager = ArchivePackager::new(OutputStructure::Flat, true);
        packager.add_artifact(artifact(0, "0001-0002", true));
        packager.add_artifact(artifact(1, "0002-0001", true));

        let archive = packager
            .finish(&RarityReport::default(), &CollectionConfig::default())
            .expect("packaging succeeds");

        let paths: Vec<&str> = archive.paths().collect();
        assert_eq!(
            paths,
            vec![
                "0001-0002.png",
                "0002-0001.png",
                "0001-0002.json",
                "0002-0001.json",
                "rarity_report.json"
            ]
        );
        assert!(!archive.contains("collection.json"));
    }

    // Tests separated layout adds folders and the collection manifest
    // Verified by omitting the manifest
    #[test]
    fn test_separated_layout() {
        let mut packager = ArchivePackager::new(OutputStructure::Separated, true);
        packager.add_artifact(artifact(0, "0001", true));

        let collection = CollectionConfig {
            name: "Critters".to_string(),
            ..CollectionConfig::default()
        };
        let archive = packager
            .finish(&RarityReport::default(), &collection)
            .expect("packaging succeeds");

        assert!(archive.contains("images/0001.png"));
        assert!(archive.contains("metadata/0001.json"));
        assert!(archive.contains("rarity_report.json"));

        let manifest: serde_json::Value = serde_json::from_slice(
            archive
                .get("collection.json")
                .expect("manifest is present"),
        )
        .expect("manifest is JSON");
        assert_eq!(manifest["name"], "Critters");
        assert_eq!(manifest["size"], 1);
        assert_eq!(manifest["includeRarity"], true);
    }

    // Tests metadata files are skipped when disabled
    // Verified by writing metadata regardless of the flag
    #[test]
    fn test_metadata_disabled() {
        let mut packager = ArchivePackager::new(OutputStructure::Flat, false);
        packager.add_artifact(artifact(0, "0001", true));

        let archive = packager
            .finish(&RarityReport::default(), &CollectionConfig::default())
            .expect("packaging succeeds");

        assert_eq!(
            archive.paths().collect::<Vec<_>>(),
            vec!["0001.png", "rarity_report.json"]
        );
    }

    // Tests rarity scores are appended only when the collection asks for them
    // Verified by always appending the score
    #[test]
    fn test_rarity_score_toggle() {
        for include_rarity in [true, false] {
            let mut packager = ArchivePackager::new(OutputStructure::Flat, true);
            packager.add_artifact(artifact(0, "0001", true));
            let collection = CollectionConfig {
                include_rarity,
                ..CollectionConfig::default()
            };

            let archive = packager
                .finish(&RarityReport::default(), &collection)
                .expect("packaging succeeds");
            let record: ItemMetadata =
                serde_json::from_slice(archive.get("0001.json").expect("metadata is present"))
                    .expect("metadata is JSON");

            let expected = if include_rarity { 2 } else { 1 };
            assert_eq!(record.attributes.len(), expected);
        }
    }

    // Tests duplicate DNA overwrites in place
    // Verified by appending a second entry for the same path
    #[test]
    fn test_duplicate_dna_overwrites() {
        let mut packager = ArchivePackager::new(OutputStructure::Flat, false);
        packager.add_artifact(artifact(0, "0001", false));
        packager.add_artifact(artifact(1, "0001", false));

        assert_eq!(packager.artifact_count(), 2);
        let archive = packager
            .finish(&RarityReport::default(), &CollectionConfig::default())
            .expect("packaging succeeds");

        assert_eq!(archive.len(), 2);
        assert_eq!(archive.get("0001.png"), Some([1u8, 1, 1].as_slice()));
    }

    // Tests path separators never escape the layout
    // Verified by using the stem unchanged
    #[test]
    fn test_paths_sanitize_separators() {
        let packager = ArchivePackager::new(OutputStructure::Separated, true);

        assert_eq!(packager.image_path("a/b-c"), "images/a%2Fb-c.png");
        assert_eq!(packager.metadata_path("a\\b"), "metadata/a%5Cb.json");
    }

    // Tests distinct stems never share a file name after escaping
    // Verified by replacing separators with an underscore
    #[test]
    fn test_escaped_stems_do_not_collide() {
        let packager = ArchivePackager::new(OutputStructure::Flat, true);
        let stems = ["a/", "a_", "a%2F", "a\\", "a%5C", "a%"];

        let paths: std::collections::HashSet<String> =
            stems.iter().map(|stem| packager.image_path(stem)).collect();

        assert_eq!(paths.len(), stems.len());
        assert!(paths.iter().all(|path| !path.contains('/')));
    }

    // Tests the archive insert reports replacement and keeps order
    // Verified by moving replaced entries to the end
    #[test]
    fn test_archive_insert_order() {
        let mut archive = CollectionArchive::new();
        assert!(archive.is_empty());

        assert!(!archive.insert("a.txt", b"1".to_vec()));
        assert!(!archive.insert("b.txt", b"2".to_vec()));
        assert!(archive.insert("a.txt", b"3".to_vec()));

        assert_eq!(archive.paths().collect::<Vec<_>>(), vec!["a.txt", "b.txt"]);
        assert_eq!(archive.get("a.txt"), Some(b"3".as_slice()));
        assert_eq!(archive.entries().len(), 2);
    }

    // Tests the tarball contains every entry with its contents
    // Verified by skipping the last entry
    #[test]
    fn test_to_tar_gz() {
        let mut archive = CollectionArchive::new();
        archive.insert("images/0001.png", vec![1, 2, 3]);
        archive.insert("rarity_report.json", b"{}".to_vec());

        let bytes = archive.to_tar_gz().expect("tarball builds");
        let mut reader = tar::Archive::new(GzDecoder::new(bytes.as_slice()));

        let mut found = Vec::new();
        for entry in reader.entries().expect("tarball is readable") {
            let mut entry = entry.expect("entry is readable");
            let path = entry
                .path()
                .expect("entry has a path")
                .to_string_lossy()
                .to_string();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).expect("entry data is readable");
            found.push((path, data));
        }

        assert_eq!(
            found,
            vec![
                ("images/0001.png".to_string(), vec![1, 2, 3]),
                ("rarity_report.json".to_string(), b"{}".to_vec())
            ]
        );
    }

    // Tests folder export recreates the layout on disk
    // Verified by writing every file to the root
    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut archive = CollectionArchive::new();
        archive.insert("images/0001.png", vec![9]);
        archive.insert("collection.json", b"{}".to_vec());

        archive.write_to_dir(dir.path()).expect("export succeeds");

        assert_eq!(
            std::fs::read(dir.path().join("images").join("0001.png")).expect("image written"),
            vec![9]
        );
        assert!(dir.path().join("collection.json").is_file());
    }
}
