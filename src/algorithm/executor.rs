use crate::{
    algorithm::{
        dna::{self, Combination, Dna},
        selection::{WeightedSelector, validate_layers},
        uniqueness::{UniquenessGuard, combination_space},
    },
    analysis::{
        metadata::ItemMetadata,
        rarity::{RarityAggregator, RarityReport},
    },
    io::{
        archive::{ArchivePackager, CollectionArchive},
        configuration::MAX_SURFACE_BYTES,
        error::{GenerationError, Result, invalid_parameter},
    },
    model::{
        artifact::GeneratedArtifact,
        layer::Layer,
        options::{CollectionConfig, GenerationOptions},
    },
    render::{
        cache::CacheStats,
        compositor::Compositor,
        loader::{ImageLoader, SourceLoader},
    },
};
use tokio_util::sync::CancellationToken;

/// Externally observable state of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    /// Inputs validated, nothing generated yet
    Initializing,
    /// Between artifacts
    Generating,
    /// Every requested artifact exists; the run can be packaged
    ReadyToPackage,
    /// A fatal error ended the run
    Failed,
}

/// Everything a finished run hands back to its caller
#[derive(Debug)]
pub struct GenerationOutput {
    /// Packaged files
    pub archive: CollectionArchive,
    /// Final attribute counts, also present in the archive
    pub rarity_report: RarityReport,
    /// Number of artifacts generated
    pub generated: usize,
    /// Seed the run used
    pub seed: u64,
    /// Layer image cache statistics
    pub cache_stats: CacheStats,
}

/// Drives one generation run from sampling to packaging
///
/// Each step samples a combination, resamples while it duplicates an earlier
/// one (when uniqueness is enforced), composites it, builds its metadata and
/// counts its attributes. Steps run strictly one after another on a single
/// surface. The executor is consumed by [`GenerationExecutor::finish`], so it
/// can never serve two runs.
pub struct GenerationExecutor<'a, L = SourceLoader> {
    layers: &'a [Layer],
    options: GenerationOptions,
    collection: CollectionConfig,
    selector: WeightedSelector,
    guard: UniquenessGuard,
    compositor: Compositor<L>,
    aggregator: RarityAggregator,
    packager: ArchivePackager,
    cancellation: CancellationToken,
    phase: RunPhase,
    target: usize,
    generated: usize,
    seed: u64,
}

impl<'a> GenerationExecutor<'a, SourceLoader> {
    /// Create an executor that resolves images from paths, URLs and embedded bytes
    ///
    /// # Errors
    ///
    /// See [`GenerationExecutor::new`]
    pub fn from_layers(
        layers: &'a [Layer],
        options: GenerationOptions,
        collection: CollectionConfig,
    ) -> Result<Self> {
        Self::new(layers, options, collection, SourceLoader::new())
    }
}

impl<'a, L: ImageLoader> GenerationExecutor<'a, L> {
    /// Validate inputs and set up the per-run accumulators
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A layer has no items or zero total weight
    /// - Uniqueness is enforced and the layers admit fewer distinct
    ///   combinations than the run needs
    /// - The output surface would exceed [`MAX_SURFACE_BYTES`]
    pub fn new(
        layers: &'a [Layer],
        options: GenerationOptions,
        collection: CollectionConfig,
        loader: L,
    ) -> Result<Self> {
        validate_layers(layers)?;
        let (width, height) = options.effective_dimensions();
        check_surface_size(width, height)?;

        let target = options.effective_count();
        let space = combination_space(layers);
        if options.enforce_uniqueness && space.is_some_and(|space| space < target as u128) {
            return Err(GenerationError::UniquenessExhausted {
                requested: target,
                generated: 0,
                attempts: 0,
                combination_space: space,
            });
        }

        let seed = options.seed.unwrap_or_else(rand::random);

        tracing::info!(
            layers = layers.len(),
            target,
            width,
            height,
            seed,
            "starting generation run"
        );

        Ok(Self {
            layers,
            selector: WeightedSelector::new(seed),
            guard: UniquenessGuard::new(options.enforce_uniqueness),
            compositor: Compositor::new(loader, width, height, options.image_timeout()),
            aggregator: RarityAggregator::new(),
            packager: ArchivePackager::new(options.output_structure, options.include_metadata),
            cancellation: CancellationToken::new(),
            phase: RunPhase::Initializing,
            target,
            generated: 0,
            seed,
            options,
            collection,
        })
    }

    /// Use `token` to cancel the run between artifacts
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Token that cancels this run when triggered
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Current run state
    pub const fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Number of artifacts the run will produce
    pub const fn target_count(&self) -> usize {
        self.target
    }

    /// Number of artifacts produced so far
    pub const fn generated(&self) -> usize {
        self.generated
    }

    /// Seed in use
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Duplicate combinations rejected so far
    pub const fn resamples(&self) -> usize {
        self.guard.rejections()
    }

    /// Attribute counts accumulated so far
    pub const fn rarity(&self) -> &RarityReport {
        self.aggregator.report()
    }

    /// Produce the next artifact
    ///
    /// Returns `false` once the target count has been reached.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The run was cancelled
    /// - No unseen combination was found within the attempt cap
    /// - The composited image could not be encoded
    /// - The run already failed
    pub async fn generate_next(&mut self) -> Result<bool> {
        if self.phase == RunPhase::Failed {
            return Err(GenerationError::RunAborted);
        }
        if self.generated >= self.target {
            self.phase = RunPhase::ReadyToPackage;
            return Ok(false);
        }
        if self.cancellation.is_cancelled() {
            self.phase = RunPhase::Failed;
            tracing::warn!(generated = self.generated, "generation run cancelled");
            return Err(GenerationError::Cancelled {
                generated: self.generated,
            });
        }

        match self.step().await {
            Ok(()) => {
                self.phase = if self.generated >= self.target {
                    RunPhase::ReadyToPackage
                } else {
                    RunPhase::Generating
                };
                Ok(true)
            }
            Err(e) => {
                self.phase = RunPhase::Failed;
                tracing::error!(generated = self.generated, "generation run failed: {e}");
                Err(e)
            }
        }
    }

    async fn step(&mut self) -> Result<()> {
        let index = self.generated;
        let layers = self.layers;

        let (combination, dna) = self.sample_unique()?;
        let draw_order = self
            .selector
            .draw_order(layers.len(), self.options.randomize_layer_order);

        let output = self
            .compositor
            .composite(index, &combination, &draw_order)
            .await?;

        let metadata = self.options.include_metadata.then(|| {
            ItemMetadata::synthesize(layers, &combination, &dna, &self.options, &self.collection)
        });

        self.aggregator.record(layers, &combination);

        tracing::info!(
            artifact = index + 1,
            total = self.target,
            dna = %dna,
            skipped_layers = output.skipped_layers.len(),
            "generated artifact"
        );

        self.packager.add_artifact(GeneratedArtifact {
            index,
            dna,
            image: output.png,
            metadata,
        });
        self.generated += 1;

        Ok(())
    }

    /// Rejection sampling bounded by the configured attempt cap
    fn sample_unique(&mut self) -> Result<(Combination<'a>, Dna)> {
        let layers = self.layers;
        let max_attempts = self.options.max_resample_attempts.max(1);

        for attempt in 1..=max_attempts {
            let combination = self.selector.sample_combination(layers)?;
            let dna = dna::encode(&combination);

            if self.guard.accept(&dna) {
                return Ok((combination, dna));
            }
            tracing::debug!(attempt, dna = %dna, "duplicate combination, resampling");
        }

        Err(GenerationError::UniquenessExhausted {
            requested: self.target,
            generated: self.generated,
            attempts: max_attempts,
            combination_space: combination_space(layers),
        })
    }

    /// Finalize the rarity report and package every artifact
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The run failed or has not reached its target count
    /// - A metadata or report file cannot be serialized
    pub fn finish(self) -> Result<GenerationOutput> {
        match self.phase {
            RunPhase::Failed => return Err(GenerationError::RunAborted),
            _ if self.generated < self.target => {
                return Err(invalid_parameter(
                    "generated",
                    &self.generated,
                    &format!("run stopped before reaching {} artifacts", self.target),
                ));
            }
            _ => {}
        }

        let cache_stats = self.compositor.cache_stats();
        let rarity_report = self.aggregator.finalize();
        let archive = self.packager.finish(&rarity_report, &self.collection)?;

        tracing::info!(
            generated = self.generated,
            files = archive.len(),
            resamples = self.guard.rejections(),
            cache_hits = cache_stats.hits,
            cache_evictions = cache_stats.evictions,
            "generation run packaged"
        );

        Ok(GenerationOutput {
            archive,
            rarity_report,
            generated: self.generated,
            seed: self.seed,
            cache_stats,
        })
    }

    /// Generate every artifact, then package them
    ///
    /// # Errors
    ///
    /// Returns the first fatal error; no archive is produced in that case
    pub async fn run(mut self) -> Result<GenerationOutput> {
        while self.generate_next().await? {}
        self.finish()
    }
}

/// Reject output sizes whose RGBA surface would not fit in memory
fn check_surface_size(width: u32, height: u32) -> Result<()> {
    let bytes = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|pixels| pixels.checked_mul(4));

    match bytes {
        Some(size) if size <= MAX_SURFACE_BYTES => Ok(()),
        _ => Err(invalid_parameter(
            "width",
            &format!("{width}x{height}"),
            &format!("output surface would exceed {MAX_SURFACE_BYTES} bytes"),
        )),
    }
}

/// Generate a full collection with the default image loader
///
/// # Errors
///
/// Returns the first fatal error of the run
pub async fn generate_collection(
    layers: &[Layer],
    options: GenerationOptions,
    collection: CollectionConfig,
) -> Result<GenerationOutput> {
    GenerationExecutor::from_layers(layers, options, collection)?
        .run()
        .await
}
