//! Layer definitions supplied by the caller

use crate::io::configuration::{
    DEFAULT_ITEM_WEIGHT, FOLDER_MAX_ITEMS, FOLDER_MAX_LAYERS, MANUAL_MAX_ITEMS, MANUAL_MAX_LAYERS,
};
use crate::io::error::{GenerationError, Result, invalid_parameter};
use base64ct::{Base64, Encoding};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Where a layer item's image comes from
///
/// Manifests give sources as strings: `http(s)` URLs, `data:` URIs carrying
/// base64 image bytes, or filesystem paths.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ImageSource {
    /// Image file on the local filesystem
    Path(PathBuf),
    /// Image served over `http` or `https`
    Url(String),
    /// Encoded image bytes already in memory
    Embedded(Arc<[u8]>),
}

impl ImageSource {
    /// Wrap encoded image bytes
    pub fn embedded(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Embedded(bytes.into())
    }

    /// Resolve a relative filesystem path against `base`
    ///
    /// URLs, embedded data and absolute paths are returned unchanged.
    #[must_use]
    pub fn relative_to(self, base: &std::path::Path) -> Self {
        match self {
            Self::Path(path) if path.is_relative() => Self::Path(base.join(path)),
            other => other,
        }
    }
}

impl FromStr for ImageSource {
    type Err = GenerationError;

    fn from_str(value: &str) -> Result<Self> {
        if let Some(uri) = value.strip_prefix("data:") {
            decode_data_uri(uri).map(Self::embedded)
        } else if value.starts_with("http://") || value.starts_with("https://") {
            Ok(Self::Url(value.to_string()))
        } else {
            Ok(Self::Path(PathBuf::from(value)))
        }
    }
}

impl TryFrom<String> for ImageSource {
    type Error = GenerationError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Decode the part of a `data:` URI after the scheme
fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let Some((header, payload)) = uri.split_once(',') else {
        return Err(invalid_parameter(
            "image",
            &"data:",
            &"data URI has no ',' before its payload",
        ));
    };
    if !header.ends_with(";base64") {
        return Err(invalid_parameter(
            "image",
            &format!("data:{header}"),
            &"only base64 data URIs are supported",
        ));
    }

    Base64::decode_vec(payload.trim())
        .map_err(|e| invalid_parameter("image", &format!("data:{header}"), &e))
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
            Self::Embedded(bytes) => write!(f, "<embedded {} bytes>", bytes.len()),
        }
    }
}

/// How a layer was authored, which decides its capacity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Bulk-imported from an image folder
    #[serde(alias = "file")]
    Folder,
    /// Authored item by item
    #[default]
    Manual,
}

impl LayerKind {
    /// Maximum number of items a layer of this kind may hold
    pub const fn item_capacity(self) -> usize {
        match self {
            Self::Folder => FOLDER_MAX_ITEMS,
            Self::Manual => MANUAL_MAX_ITEMS,
        }
    }

    /// Maximum number of layers a collection of this kind may hold
    pub const fn layer_capacity(self) -> usize {
        match self {
            Self::Folder => FOLDER_MAX_LAYERS,
            Self::Manual => MANUAL_MAX_LAYERS,
        }
    }
}

/// One selectable visual asset within a layer
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LayerItem {
    /// Short stable identifier, conventionally a 4-digit code
    pub id: String,
    /// Optional display name, not used by generation
    #[serde(default)]
    pub name: Option<String>,
    /// Image to draw; items without one contribute no pixels
    #[serde(default)]
    pub image: Option<ImageSource>,
    /// Relative selection weight within the layer
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Display position, ignored by selection
    #[serde(default)]
    pub order: usize,
}

const fn default_weight() -> u32 {
    DEFAULT_ITEM_WEIGHT
}

impl LayerItem {
    /// Create an item with no image
    pub fn new(id: impl Into<String>, weight: u32) -> Self {
        Self {
            id: id.into(),
            name: None,
            image: None,
            weight,
            order: 0,
        }
    }

    /// Attach an image source
    #[must_use]
    pub fn with_image(mut self, image: ImageSource) -> Self {
        self.image = Some(image);
        self
    }

    /// Attach a display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Named, ordered set of items making up one stacking level
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Layer {
    /// Layer name, used as the trait type
    pub name: String,
    /// Authoring kind
    #[serde(rename = "type", default)]
    pub kind: LayerKind,
    /// Items in stored order
    #[serde(default)]
    pub items: Vec<LayerItem>,
}

impl Layer {
    /// Create an empty layer
    pub fn new(name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            items: Vec::new(),
        }
    }

    /// Append an item, assigning its display order
    #[must_use]
    pub fn with_item(mut self, mut item: LayerItem) -> Self {
        item.order = self.items.len();
        self.items.push(item);
        self
    }

    /// Sum of all item weights
    pub fn total_weight(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.weight)).sum()
    }

    /// Number of items that can actually be selected
    pub fn selectable_count(&self) -> usize {
        self.items.iter().filter(|item| item.weight > 0).count()
    }
}
