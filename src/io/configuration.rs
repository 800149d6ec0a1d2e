//! Generation constants and runtime configuration defaults

// Run sizing
/// Maximum number of artifacts produced by a preview run
pub const PREVIEW_CAP: usize = 5;
/// Requested artifact count when none is given
pub const DEFAULT_COLLECTION_SIZE: usize = 10;

// Output resolution
/// Default output width in pixels
pub const DEFAULT_WIDTH: u32 = 600;
/// Default output height in pixels
pub const DEFAULT_HEIGHT: u32 = 1000;
/// Output width forced by collector edition mode
pub const COLLECTOR_WIDTH: u32 = 1200;
/// Output height forced by collector edition mode
pub const COLLECTOR_HEIGHT: u32 = 2000;
/// Largest output surface, in bytes of RGBA, a run may allocate
pub const MAX_SURFACE_BYTES: u64 = 1 << 30;

/// Edition label written for collector edition runs
pub const COLLECTOR_EDITION: &str = "Collector";
/// Edition label written for standard runs
pub const STANDARD_EDITION: &str = "Standard";

// Image resolution
/// Time allowed to fetch and decode one layer image
pub const DEFAULT_IMAGE_TIMEOUT_MS: u64 = 3000;
/// Bytes of decoded layer images kept in memory during a run
pub const IMAGE_CACHE_BUDGET_BYTES: usize = 256 * 1024 * 1024;

// Prevents livelock when the combination space is nearly used up
/// Sampling attempts allowed per artifact when uniqueness is enforced
pub const DEFAULT_MAX_RESAMPLE_ATTEMPTS: usize = 10_000;

/// Number of identifier characters each layer contributes to a DNA
pub const DNA_SEGMENT_LEN: usize = 4;

/// Weight given to items that don't declare one
pub const DEFAULT_ITEM_WEIGHT: u32 = 100;

// Capacities enforced by the layer loaders, not the engine
/// Maximum number of layers in a folder-sourced collection
pub const FOLDER_MAX_LAYERS: usize = 10;
/// Maximum number of items in a folder-sourced layer
pub const FOLDER_MAX_ITEMS: usize = 50;
/// Maximum number of layers in a manually authored collection
pub const MANUAL_MAX_LAYERS: usize = 500;
/// Maximum number of items in a manually authored layer
pub const MANUAL_MAX_ITEMS: usize = 500;

/// Image file extensions picked up when scanning layer folders
pub const LAYER_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

// Archive layout
/// Rarity report file name, always at the archive root
pub const RARITY_REPORT_FILE: &str = "rarity_report.json";
/// Collection manifest file name for the separated layout
pub const COLLECTION_MANIFEST_FILE: &str = "collection.json";
/// Image directory for the separated layout
pub const IMAGES_DIR: &str = "images";
/// Metadata directory for the separated layout
pub const METADATA_DIR: &str = "metadata";
/// Suffix added to archive file names written by the CLI
pub const ARCHIVE_SUFFIX: &str = "_collection.tar.gz";

// Metadata
/// Image reference written until the images are hosted somewhere permanent
pub const DEFERRED_IMAGE_URI: &str = "ipfs://TO_BE_FILLED";
/// Trait name of the appended rarity score attribute
pub const RARITY_SCORE_TRAIT: &str = "Rarity Score";
/// Collection name used when none is configured
pub const DEFAULT_COLLECTION_NAME: &str = "Layerforge Collection";
/// Collection description used when none is configured
pub const DEFAULT_COLLECTION_DESCRIPTION: &str = "A collection generated with Layerforge";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
