use crate::{
    algorithm::dna::{Combination, Selection},
    io::error::{GenerationError, Result, invalid_layer},
    model::layer::{Layer, LayerItem},
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Check that every layer can be sampled
///
/// # Errors
///
/// Returns [`GenerationError::InvalidLayerConfiguration`] if:
/// - The layer set is empty
/// - A layer has no items
/// - A layer's item weights sum to zero
pub fn validate_layers(layers: &[Layer]) -> Result<()> {
    if layers.is_empty() {
        return Err(invalid_layer("<none>", &"at least one layer is required"));
    }

    for layer in layers {
        if layer.items.is_empty() {
            return Err(invalid_layer(&layer.name, &"layer has no items"));
        }
        if layer.total_weight() == 0 {
            return Err(invalid_layer(&layer.name, &"all item weights are zero"));
        }
    }

    Ok(())
}

/// Seeded weighted sampler for layer items
pub struct WeightedSelector {
    rng: StdRng,
}

impl WeightedSelector {
    /// Create a deterministic selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Weighted random selection over integer weights
    ///
    /// Draws a uniform value in `[0, total)` and walks the weights in order,
    /// returning the first index where the running remainder reaches zero.
    /// Zero-weight entries are never returned. Returns `None` when the weights
    /// sum to zero.
    pub fn weighted_choice(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&weight| u64::from(weight)).sum();
        if total == 0 {
            return None;
        }

        let mut remainder = self.rng.random::<f64>() * total as f64;
        for (i, &weight) in weights.iter().enumerate() {
            if weight == 0 {
                continue;
            }
            remainder -= f64::from(weight);
            if remainder <= 0.0 {
                return Some(i);
            }
        }

        // Float accumulation can leave a sliver after the last item; fall back to
        // the last selectable one rather than drifting past the end
        weights.iter().rposition(|&weight| weight > 0)
    }

    /// Pick one item from a layer with probability proportional to its weight
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidLayerConfiguration`] if the layer has
    /// no items or only zero-weight items
    pub fn select<'a>(&mut self, layer: &'a Layer) -> Result<Selection<'a>> {
        let weights: Vec<u32> = layer.items.iter().map(|item| item.weight).collect();

        let item_index = self.weighted_choice(&weights).ok_or_else(|| {
            if layer.items.is_empty() {
                invalid_layer(&layer.name, &"layer has no items")
            } else {
                invalid_layer(&layer.name, &"all item weights are zero")
            }
        })?;

        let item: &'a LayerItem =
            layer
                .items
                .get(item_index)
                .ok_or_else(|| GenerationError::InvalidLayerConfiguration {
                    layer: layer.name.clone(),
                    reason: format!("selected index {item_index} is out of range"),
                })?;

        Ok(Selection { item_index, item })
    }

    /// Sample one item from every layer, in layer order
    ///
    /// # Errors
    ///
    /// Returns an error if any layer cannot be sampled
    pub fn sample_combination<'a>(&mut self, layers: &'a [Layer]) -> Result<Combination<'a>> {
        let selections = layers
            .iter()
            .map(|layer| self.select(layer))
            .collect::<Result<Vec<_>>>()?;

        Ok(Combination::new(selections))
    }

    /// Layer draw order for one artifact
    ///
    /// Bottom-to-top layer order unless `shuffle` is set, in which case the
    /// order is permuted with the selector's generator.
    pub fn draw_order(&mut self, layer_count: usize, shuffle: bool) -> Vec<usize> {
        let mut order: Vec<usize> = (0..layer_count).collect();
        if shuffle {
            order.shuffle(&mut self.rng);
        }
        order
    }
}
