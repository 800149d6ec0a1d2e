//! Attribute frequency tracking across a run

use crate::{algorithm::dna::Combination, model::layer::Layer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Finalized occurrence counts: layer name to item identifier to count
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RarityReport {
    counts: BTreeMap<String, BTreeMap<String, usize>>,
}

impl RarityReport {
    /// Occurrences of `value` in `layer`
    pub fn count(&self, layer: &str, value: &str) -> usize {
        self.counts
            .get(layer)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// Counts for one layer
    pub fn layer(&self, layer: &str) -> Option<&BTreeMap<String, usize>> {
        self.counts.get(layer)
    }

    /// Sum of all counts recorded for `layer`
    pub fn layer_total(&self, layer: &str) -> usize {
        self.counts
            .get(layer)
            .map_or(0, |values| values.values().sum())
    }

    /// Layer names with at least one recorded value
    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Statistical rarity of a set of traits among `population` artifacts
    ///
    /// Sums `population / count` over the traits, so rarer values weigh more.
    /// Traits never recorded contribute nothing. Rounded to two decimals.
    pub fn score<'a>(
        &self,
        traits: impl IntoIterator<Item = (&'a str, &'a str)>,
        population: usize,
    ) -> f64 {
        let score: f64 = traits
            .into_iter()
            .map(|(layer, value)| self.count(layer, value))
            .filter(|&count| count > 0)
            .map(|count| population as f64 / count as f64)
            .sum();

        (score * 100.0).round() / 100.0
    }
}

/// Accumulates attribute occurrences while a run progresses
///
/// Counts only ever grow; finalizing hands back the report.
#[derive(Debug, Default)]
pub struct RarityAggregator {
    report: RarityReport,
    recorded: usize,
}

impl RarityAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one generated artifact's `(layer, item)` pairs
    pub fn record(&mut self, layers: &[Layer], combination: &Combination<'_>) {
        for (layer, item) in layers.iter().zip(combination.items()) {
            *self
                .report
                .counts
                .entry(layer.name.clone())
                .or_default()
                .entry(item.id.clone())
                .or_insert(0) += 1;
        }
        self.recorded += 1;
    }

    /// Number of artifacts recorded
    pub const fn recorded(&self) -> usize {
        self.recorded
    }

    /// Current counts
    pub const fn report(&self) -> &RarityReport {
        &self.report
    }

    /// Close the run and return the report
    pub fn finalize(self) -> RarityReport {
        self.report
    }
}
