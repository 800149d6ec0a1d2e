//! Combinations of chosen items and their canonical DNA encoding

use crate::io::configuration::DNA_SEGMENT_LEN;
use crate::model::layer::LayerItem;
use std::fmt;

/// One chosen item, remembered with its position inside its layer
#[derive(Clone, Copy, Debug)]
pub struct Selection<'a> {
    /// Index of the item within its layer
    pub item_index: usize,
    /// The chosen item
    pub item: &'a LayerItem,
}

/// Exactly one chosen item per layer, in layer order
#[derive(Clone, Debug, Default)]
pub struct Combination<'a> {
    selections: Vec<Selection<'a>>,
}

impl<'a> Combination<'a> {
    /// Build a combination from per-layer selections
    pub const fn new(selections: Vec<Selection<'a>>) -> Self {
        Self { selections }
    }

    /// Selections in layer order
    pub fn selections(&self) -> &[Selection<'a>] {
        &self.selections
    }

    /// Selection for the layer at `layer_index`
    pub fn get(&self, layer_index: usize) -> Option<&Selection<'a>> {
        self.selections.get(layer_index)
    }

    /// Chosen items in layer order
    pub fn items(&self) -> impl Iterator<Item = &'a LayerItem> + '_ {
        self.selections.iter().map(|selection| selection.item)
    }

    /// Number of layers covered
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Whether the combination covers no layers
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

/// Canonical identity of a combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dna {
    /// Concatenated identifier segments, compared for uniqueness
    pub raw: String,
    /// Dash-joined identifier segments, used as display name and file stem
    pub formatted: String,
}

impl fmt::Display for Dna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted)
    }
}

/// Leading part of an identifier that participates in DNA
///
/// Cuts on a character boundary so multi-byte identifiers never split.
pub fn dna_segment(id: &str) -> &str {
    id.char_indices()
        .nth(DNA_SEGMENT_LEN)
        .map_or(id, |(end, _)| id.get(..end).unwrap_or(id))
}

/// Encode a combination into its raw and formatted DNA
pub fn encode(combination: &Combination<'_>) -> Dna {
    let segments: Vec<&str> = combination.items().map(|item| dna_segment(&item.id)).collect();

    Dna {
        raw: segments.concat(),
        formatted: segments.join("-"),
    }
}
