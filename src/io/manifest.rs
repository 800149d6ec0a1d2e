//! Layer definitions from JSON manifests or folders of layer images

use crate::io::configuration::{DEFAULT_ITEM_WEIGHT, LAYER_IMAGE_EXTENSIONS};
use crate::io::error::{GenerationError, Result, invalid_parameter};
use crate::model::layer::{ImageSource, Layer, LayerItem, LayerKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestDocument {
    Wrapped { layers: Vec<Layer> },
    Bare(Vec<Layer>),
}

/// Load layers from a JSON manifest
///
/// Accepts either `{"layers": [...]}` or a bare array of layers. Relative image
/// paths are resolved against the manifest's directory.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The JSON does not describe layers
/// - A capacity limit for the layers' kind is exceeded
pub fn load_manifest(path: &Path) -> Result<Vec<Layer>> {
    let contents = std::fs::read_to_string(path).map_err(|e| GenerationError::FileSystem {
        path: path.to_path_buf(),
        operation: "read manifest",
        source: e,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let layers = parse_manifest(&contents, base).map_err(|e| GenerationError::Manifest {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_capacity(&layers)?;
    Ok(layers)
}

/// Parse manifest JSON, resolving relative image paths against `base`
///
/// # Errors
///
/// Returns the JSON error if the document does not describe layers
pub fn parse_manifest(
    contents: &str,
    base: &Path,
) -> std::result::Result<Vec<Layer>, serde_json::Error> {
    let mut layers = match serde_json::from_str::<ManifestDocument>(contents)? {
        ManifestDocument::Wrapped { layers } | ManifestDocument::Bare(layers) => layers,
    };

    for layer in &mut layers {
        for item in &mut layer.items {
            item.image = item.image.take().map(|source| source.relative_to(base));
        }
    }

    Ok(layers)
}

/// Check layer and item counts against the limits of each layer's kind
///
/// A collection takes the layer limit of its most restrictive kind.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidParameter`] naming the first exceeded limit
pub fn validate_capacity(layers: &[Layer]) -> Result<()> {
    let layer_limit = layers
        .iter()
        .map(|layer| layer.kind.layer_capacity())
        .min()
        .unwrap_or(usize::MAX);
    if layers.len() > layer_limit {
        return Err(invalid_parameter(
            "layers",
            &layers.len(),
            &format!("at most {layer_limit} layers are allowed"),
        ));
    }

    for layer in layers {
        let item_limit = layer.kind.item_capacity();
        if layer.items.len() > item_limit {
            return Err(invalid_parameter(
                "items",
                &layer.items.len(),
                &format!("layer '{}' allows at most {item_limit} items", layer.name),
            ));
        }
    }

    Ok(())
}

/// Build folder-kind layers from a directory of layer folders
///
/// Each subdirectory, in name order, becomes a layer named after it. Image
/// files inside it, in name order, become items with 4-digit codes starting at
/// `0001` and the default weight. Folders beyond the item capacity are
/// truncated with a warning; folders without images are skipped.
///
/// # Errors
///
/// Returns an error if:
/// - A directory cannot be read
/// - There are more layer folders than a folder collection allows
/// - No folder contains images
pub fn scan_layer_folders(root: &Path) -> Result<Vec<Layer>> {
    let mut folders = list_sorted(root, Path::is_dir)?;
    folders.retain(|folder| {
        folder
            .file_name()
            .is_some_and(|name| !name.to_string_lossy().starts_with('.'))
    });

    let layer_limit = LayerKind::Folder.layer_capacity();
    if folders.len() > layer_limit {
        return Err(invalid_parameter(
            "layers",
            &folders.len(),
            &format!("at most {layer_limit} layer folders are allowed"),
        ));
    }

    let mut layers = Vec::with_capacity(folders.len());
    for folder in folders {
        let name = folder
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut images = list_sorted(&folder, |path| path.is_file() && is_layer_image(path))?;
        if images.is_empty() {
            tracing::warn!(layer = %name, "no images found in layer folder, skipping");
            continue;
        }

        let item_limit = LayerKind::Folder.item_capacity();
        if images.len() > item_limit {
            tracing::warn!(
                layer = %name,
                found = images.len(),
                kept = item_limit,
                "layer folder exceeds item capacity, keeping the first images"
            );
            images.truncate(item_limit);
        }

        let layer = images.into_iter().enumerate().fold(
            Layer::new(name, LayerKind::Folder),
            |layer, (index, image)| {
                let stem = image
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_default();
                layer.with_item(
                    LayerItem::new(format!("{:04}", index + 1), DEFAULT_ITEM_WEIGHT)
                        .with_name(stem)
                        .with_image(ImageSource::Path(image)),
                )
            },
        );
        layers.push(layer);
    }

    if layers.is_empty() {
        return Err(invalid_parameter(
            "layers",
            &root.display(),
            &"no layer folder contains images",
        ));
    }

    Ok(layers)
}

/// Whether `path` has one of the accepted layer image extensions
pub fn is_layer_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            LAYER_IMAGE_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
}

fn list_sorted(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let read_error = |e: std::io::Error| GenerationError::FileSystem {
        path: dir.to_path_buf(),
        operation: "read directory",
        source: e,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
