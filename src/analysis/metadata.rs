//! Per-item metadata records and the collection manifest

use crate::{
    algorithm::dna::{Combination, Dna},
    io::configuration::{DEFERRED_IMAGE_URI, RARITY_SCORE_TRAIT},
    model::{
        layer::Layer,
        options::{CollectionConfig, GenerationOptions},
    },
};
use serde::{Deserialize, Serialize};

/// Value of one metadata attribute
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraitValue {
    /// Chosen item identifier
    Text(String),
    /// Numeric score
    Number(f64),
}

/// One `(trait_type, value)` pair
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitAttribute {
    /// Layer name, or the score name for appended scores
    pub trait_type: String,
    /// Attribute value
    pub value: TraitValue,
}

/// Metadata record written for one artifact
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    /// Display name, the formatted DNA
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Deferred external image reference
    pub image: String,
    /// Formatted DNA
    pub dna: String,
    /// Raw DNA
    pub raw_dna: String,
    /// Edition label
    pub edition: String,
    /// One attribute per layer, in layer order
    pub attributes: Vec<TraitAttribute>,
}

impl ItemMetadata {
    /// Build the record for one artifact
    ///
    /// Attributes pair each layer name with the full identifier of the item
    /// chosen for it.
    pub fn synthesize(
        layers: &[Layer],
        combination: &Combination<'_>,
        dna: &Dna,
        options: &GenerationOptions,
        collection: &CollectionConfig,
    ) -> Self {
        let attributes = layers
            .iter()
            .zip(combination.items())
            .map(|(layer, item)| TraitAttribute {
                trait_type: layer.name.clone(),
                value: TraitValue::Text(item.id.clone()),
            })
            .collect();

        Self {
            name: dna.formatted.clone(),
            description: collection.description.clone(),
            image: DEFERRED_IMAGE_URI.to_string(),
            dna: dna.formatted.clone(),
            raw_dna: dna.raw.clone(),
            edition: options.edition_label().to_string(),
            attributes,
        }
    }

    /// `(trait_type, value)` pairs whose value is an item identifier
    pub fn traits(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .filter_map(|attribute| match &attribute.value {
                TraitValue::Text(value) => Some((attribute.trait_type.as_str(), value.as_str())),
                TraitValue::Number(_) => None,
            })
    }

    /// Copy of this record with a rarity score attribute appended
    #[must_use]
    pub fn with_rarity_score(&self, score: f64) -> Self {
        let mut record = self.clone();
        record.attributes.push(TraitAttribute {
            trait_type: RARITY_SCORE_TRAIT.to_string(),
            value: TraitValue::Number(score),
        });
        record
    }
}

/// Collection-level manifest written by the separated layout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionManifest {
    /// Collection name
    pub name: String,
    /// Collection description
    pub description: String,
    /// Number of artifacts actually generated
    pub size: usize,
    /// Whether metadata carries a rarity score
    #[serde(rename = "includeRarity")]
    pub include_rarity: bool,
}

impl CollectionManifest {
    /// Describe a finished run
    pub fn new(collection: &CollectionConfig, size: usize) -> Self {
        Self {
            name: collection.name.clone(),
            description: collection.description.clone(),
            size,
            include_rarity: collection.include_rarity,
        }
    }
}
