//! Command-line interface for generating a collection from layer folders or manifests

use crate::algorithm::executor::{GenerationExecutor, GenerationOutput};
use crate::io::configuration::{
    ARCHIVE_SUFFIX, DEFAULT_COLLECTION_DESCRIPTION, DEFAULT_COLLECTION_NAME,
    DEFAULT_COLLECTION_SIZE, DEFAULT_HEIGHT, DEFAULT_IMAGE_TIMEOUT_MS,
    DEFAULT_MAX_RESAMPLE_ATTEMPTS, DEFAULT_WIDTH,
};
use crate::io::error::{GenerationError, Result, invalid_parameter};
use crate::io::manifest::{load_manifest, scan_layer_folders};
use crate::io::progress::ProgressManager;
use crate::model::layer::Layer;
use crate::model::options::{CollectionConfig, GenerationOptions, OutputStructure};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "layerforge")]
#[command(
    author,
    version,
    about = "Generate a collection of unique images by stacking weighted layers"
)]
/// Command-line arguments for the collection generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// JSON layer manifest, or a directory whose subfolders are layers
    #[arg(value_name = "LAYERS")]
    pub layers: PathBuf,

    /// Output archive path, or output directory with --extract
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a folder tree instead of a .tar.gz archive
    #[arg(short = 'x', long)]
    pub extract: bool,

    /// Number of artifacts to generate
    #[arg(short = 'n', long, default_value_t = DEFAULT_COLLECTION_SIZE)]
    pub count: usize,

    /// Output width in pixels
    #[arg(short = 'w', long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Output height in pixels
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Skip per-item metadata files
    #[arg(long)]
    pub no_metadata: bool,

    /// Generate at most a handful of artifacts
    #[arg(short, long)]
    pub preview: bool,

    /// Allow duplicate combinations
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Put images and metadata in separate folders with a collection manifest
    #[arg(short, long)]
    pub separated: bool,

    /// Shuffle the layer draw order for every artifact
    #[arg(long)]
    pub randomize_layer_order: bool,

    /// Render at the fixed collector edition resolution
    #[arg(short, long)]
    pub edition: bool,

    /// Random seed for reproducible generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sampling attempts per artifact before giving up on uniqueness
    #[arg(long, default_value_t = DEFAULT_MAX_RESAMPLE_ATTEMPTS)]
    pub max_attempts: usize,

    /// Time allowed to load one layer image, in milliseconds
    #[arg(long, default_value_t = DEFAULT_IMAGE_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Collection name
    #[arg(long, default_value = DEFAULT_COLLECTION_NAME)]
    pub name: String,

    /// Collection description
    #[arg(long, default_value = DEFAULT_COLLECTION_DESCRIPTION)]
    pub description: String,

    /// Leave the rarity score out of item metadata
    #[arg(long)]
    pub no_rarity: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every generated artifact
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Generation options described by the flags
    pub const fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            width: self.width,
            height: self.height,
            number_of_items: self.count,
            include_metadata: !self.no_metadata,
            preview_mode: self.preview,
            enforce_uniqueness: !self.allow_duplicates,
            output_structure: if self.separated {
                OutputStructure::Separated
            } else {
                OutputStructure::Flat
            },
            randomize_layer_order: self.randomize_layer_order,
            edition_mode: self.edition,
            max_resample_attempts: self.max_attempts,
            image_timeout_ms: self.timeout_ms,
            seed: self.seed,
        }
    }

    /// Collection settings described by the flags
    pub fn collection_config(&self) -> CollectionConfig {
        CollectionConfig {
            name: self.name.clone(),
            description: self.description.clone(),
            include_rarity: !self.no_rarity,
        }
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Runs one generation from parsed arguments and writes the result
pub struct GenerationCommand {
    cli: Cli,
    progress: ProgressManager,
}

impl GenerationCommand {
    /// Create a command for the given arguments
    pub fn new(cli: Cli) -> Self {
        let progress = if cli.should_show_progress() {
            ProgressManager::new()
        } else {
            ProgressManager::hidden()
        };

        Self { cli, progress }
    }

    /// Load layers, generate the collection and write it out
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, generation or writing fails
    pub async fn process(&self) -> Result<PathBuf> {
        let layers = self.load_layers()?;
        let output = self.generate(&layers).await?;

        let destination = self.output_path();
        if self.cli.extract {
            output.archive.write_to_dir(&destination)?;
        } else {
            let bytes = output.archive.to_tar_gz()?;
            if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| GenerationError::FileSystem {
                    path: parent.to_path_buf(),
                    operation: "create directory",
                    source: e,
                })?;
            }
            std::fs::write(&destination, bytes).map_err(|e| GenerationError::FileSystem {
                path: destination.clone(),
                operation: "write archive",
                source: e,
            })?;
        }

        tracing::info!(
            path = %destination.display(),
            generated = output.generated,
            seed = output.seed,
            "collection written"
        );
        Ok(destination)
    }

    /// Read layer definitions from the target manifest or folder
    ///
    /// # Errors
    ///
    /// Returns an error if the target is neither a directory nor a JSON file,
    /// or if it cannot be loaded
    pub fn load_layers(&self) -> Result<Vec<Layer>> {
        let target = &self.cli.layers;

        if target.is_dir() {
            scan_layer_folders(target)
        } else if target.is_file() {
            if target.extension().and_then(|s| s.to_str()) == Some("json") {
                load_manifest(target)
            } else {
                Err(invalid_parameter(
                    "layers",
                    &target.display(),
                    &"layer manifest must be a .json file",
                ))
            }
        } else {
            Err(invalid_parameter(
                "layers",
                &target.display(),
                &"target must be a JSON manifest or a directory",
            ))
        }
    }

    async fn generate(&self, layers: &[Layer]) -> Result<GenerationOutput> {
        let mut executor = GenerationExecutor::from_layers(
            layers,
            self.cli.generation_options(),
            self.cli.collection_config(),
        )?;

        self.progress.initialize(executor.target_count());
        self.progress
            .set_status(&format!("seed {}", executor.seed()));

        // Ctrl-C cancels the run at the next artifact boundary
        let token = executor.cancellation_token();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });

        let outcome = loop {
            match executor.generate_next().await {
                Ok(true) => self.progress.complete_artifact(),
                Ok(false) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        interrupt.abort();

        if let Err(e) = outcome {
            self.progress.abandon();
            return Err(e);
        }

        let output = executor.finish()?;
        self.progress.finish(&format!(
            "{} artifacts, seed {}",
            output.generated, output.seed
        ));
        Ok(output)
    }

    /// Where the collection is written
    pub fn output_path(&self) -> PathBuf {
        self.cli.output.clone().unwrap_or_else(|| {
            let slug = self.cli.collection_config().slug();
            if self.cli.extract {
                PathBuf::from(slug)
            } else {
                Path::new(".").join(format!("{slug}{ARCHIVE_SUFFIX}"))
            }
        })
    }
}
