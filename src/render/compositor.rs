//! Layer stacking onto a reusable output surface and PNG encoding

use crate::{
    algorithm::dna::Combination,
    io::configuration::IMAGE_CACHE_BUDGET_BYTES,
    io::error::{GenerationError, Result},
    render::{
        cache::{CacheStats, LayerImageCache, LayerImageKey},
        loader::{ImageLoader, resolve_image},
    },
};
use image::{ImageFormat, Rgba, RgbaImage, imageops};
use std::io::Cursor;
use std::time::Duration;

/// Result of compositing one artifact
#[derive(Debug)]
pub struct CompositeOutput {
    /// PNG-encoded image bytes
    pub png: Vec<u8>,
    /// Layers left out because their image could not be resolved
    pub skipped_layers: Vec<usize>,
}

/// Draws combinations onto a single surface, one artifact at a time
///
/// The surface is cleared before every artifact, so nothing bleeds from one
/// artifact into the next. Layers are resolved and drawn one after another in
/// the given order because each draw mutates the shared surface.
pub struct Compositor<L> {
    loader: L,
    surface: RgbaImage,
    timeout: Duration,
    cache: LayerImageCache,
}

impl<L: ImageLoader> Compositor<L> {
    /// Create a compositor with a transparent `width` x `height` surface
    pub fn new(loader: L, width: u32, height: u32, timeout: Duration) -> Self {
        Self {
            loader,
            surface: RgbaImage::new(width, height),
            timeout,
            cache: LayerImageCache::with_budget(IMAGE_CACHE_BUDGET_BYTES),
        }
    }

    /// Keep at most `budget` bytes of decoded layer images between artifacts
    #[must_use]
    pub fn with_cache_budget(mut self, budget: usize) -> Self {
        self.cache = LayerImageCache::with_budget(budget);
        self
    }

    /// Surface dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    /// Image cache statistics for the run so far
    pub const fn cache_stats(&self) -> CacheStats {
        self.cache.stats
    }

    /// Bytes of decoded layer images currently cached
    pub const fn cached_bytes(&self) -> usize {
        self.cache.held_bytes()
    }

    /// Composite `combination` into a PNG, drawing layers in `draw_order`
    ///
    /// Layers whose image times out, fails to load or fails to decode are skipped
    /// and reported in [`CompositeOutput::skipped_layers`]; items without an
    /// image are left out silently.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::EncodingFailed`] if the surface cannot be
    /// encoded, which aborts the run
    pub async fn composite(
        &mut self,
        artifact: usize,
        combination: &Combination<'_>,
        draw_order: &[usize],
    ) -> Result<CompositeOutput> {
        clear_surface(&mut self.surface);
        let dimensions = self.surface.dimensions();
        let mut skipped_layers = Vec::new();

        if dimensions.0 > 0 && dimensions.1 > 0 {
            for &layer_index in draw_order {
                let Some(selection) = combination.get(layer_index) else {
                    continue;
                };
                let Some(source) = selection.item.image.as_ref() else {
                    continue;
                };

                let key = LayerImageKey::new(layer_index, selection.item_index);
                let image = if let Some(cached) = self.cache.get(key) {
                    cached
                } else {
                    match resolve_image(&self.loader, source, dimensions, self.timeout).await {
                        Ok(image) => {
                            tracing::debug!(
                                layer = layer_index,
                                item = %selection.item.id,
                                "resolved layer image"
                            );
                            self.cache.insert(key, image)
                        }
                        Err(failure) => {
                            tracing::warn!(
                                artifact = artifact + 1,
                                layer = layer_index,
                                item = %selection.item.id,
                                "{failure}; layer skipped"
                            );
                            skipped_layers.push(layer_index);
                            continue;
                        }
                    }
                };

                imageops::overlay(&mut self.surface, &*image, 0, 0);
            }
        }

        let png = encode_png(&self.surface).map_err(|reason| GenerationError::EncodingFailed {
            artifact,
            reason,
        })?;

        Ok(CompositeOutput {
            png,
            skipped_layers,
        })
    }
}

fn clear_surface(surface: &mut RgbaImage) {
    for pixel in surface.pixels_mut() {
        *pixel = Rgba([0, 0, 0, 0]);
    }
}

/// Encode a surface as PNG
///
/// # Errors
///
/// Returns a description of the failure if the surface is empty or the encoder
/// rejects it
pub fn encode_png(surface: &RgbaImage) -> std::result::Result<Vec<u8>, String> {
    let (width, height) = surface.dimensions();
    if width == 0 || height == 0 {
        return Err(format!("surface has no pixels ({width}x{height})"));
    }

    let mut bytes = Vec::new();
    surface
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(bytes)
}
