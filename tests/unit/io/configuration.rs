//! Tests for configuration constants and their relationships

#[cfg(test)]
mod tests {
    use layerforge::io::configuration::{
        ARCHIVE_SUFFIX, COLLECTOR_HEIGHT, COLLECTOR_WIDTH, DEFAULT_HEIGHT, DEFAULT_ITEM_WEIGHT,
        DEFAULT_WIDTH, DNA_SEGMENT_LEN, FOLDER_MAX_ITEMS, FOLDER_MAX_LAYERS, LAYER_IMAGE_EXTENSIONS,
        MANUAL_MAX_ITEMS, MANUAL_MAX_LAYERS, PREVIEW_CAP,
    };

    // Tests the collector edition doubles the default resolution
    // Verified by changing collector dimensions
    #[test]
    fn test_collector_resolution_is_double_default() {
        assert_eq!(COLLECTOR_WIDTH, DEFAULT_WIDTH * 2);
        assert_eq!(COLLECTOR_HEIGHT, DEFAULT_HEIGHT * 2);
    }

    // Tests capacity limits keep folder imports within manual limits
    // Verified by raising folder limits above manual ones
    #[test]
    fn test_capacity_ordering() {
        const _: () = assert!(FOLDER_MAX_LAYERS <= MANUAL_MAX_LAYERS);
        const _: () = assert!(FOLDER_MAX_ITEMS <= MANUAL_MAX_ITEMS);
        assert_eq!(FOLDER_MAX_LAYERS, 10);
        assert_eq!(FOLDER_MAX_ITEMS, 50);
    }

    // Tests generation constants are usable
    // Verified by setting each to zero
    #[test]
    fn test_generation_constants() {
        assert_eq!(PREVIEW_CAP, 5);
        assert_eq!(DNA_SEGMENT_LEN, 4);
        assert!(DEFAULT_ITEM_WEIGHT > 0);
        assert!(ARCHIVE_SUFFIX.ends_with(".tar.gz"));
    }

    // Tests accepted image extensions are lowercase without dots
    // Verified by adding a dotted extension
    #[test]
    fn test_layer_image_extensions() {
        for extension in LAYER_IMAGE_EXTENSIONS {
            assert!(!extension.starts_with('.'));
            assert_eq!(extension, extension.to_lowercase());
        }
        assert!(LAYER_IMAGE_EXTENSIONS.contains(&"png"));
    }
}
