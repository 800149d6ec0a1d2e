use crate::{algorithm::dna::Dna, model::layer::Layer};
use std::collections::HashSet;

/// Number of distinct combinations a layer set can produce
///
/// Only items with a positive weight count, since the others are never
/// selected. Returns `None` when the product overflows, which callers treat as
/// an unbounded space.
pub fn combination_space(layers: &[Layer]) -> Option<u128> {
    layers.iter().try_fold(1u128, |acc, layer| {
        acc.checked_mul(layer.selectable_count() as u128)
    })
}

/// Tracks raw DNA accepted during one run
///
/// The formatted form is tracked too: it names the artifact's files, and
/// identifiers containing `-` can give two distinct raw DNAs the same
/// formatted form. When enforcement is off every combination is accepted,
/// duplicates included.
#[derive(Debug, Default)]
pub struct UniquenessGuard {
    enforced: bool,
    seen: HashSet<String>,
    names: HashSet<String>,
    rejections: usize,
}

impl UniquenessGuard {
    /// Create an empty guard
    pub fn new(enforced: bool) -> Self {
        Self {
            enforced,
            ..Self::default()
        }
    }

    /// Whether duplicates are rejected
    pub const fn is_enforced(&self) -> bool {
        self.enforced
    }

    /// Accept a freshly sampled DNA unless its raw or formatted form was
    /// already accepted this run
    pub fn accept(&mut self, dna: &Dna) -> bool {
        if !self.enforced {
            return true;
        }

        if self.seen.contains(&dna.raw) || self.names.contains(&dna.formatted) {
            self.rejections += 1;
            return false;
        }

        self.seen.insert(dna.raw.clone());
        self.names.insert(dna.formatted.clone());
        true
    }

    /// Whether `dna` was already accepted
    pub fn contains(&self, dna: &Dna) -> bool {
        self.seen.contains(&dna.raw)
    }

    /// Number of distinct DNA values accepted so far
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been accepted yet
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Number of duplicates rejected so far
    pub const fn rejections(&self) -> usize {
        self.rejections
    }
}
