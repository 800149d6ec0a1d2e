//! Asynchronous layer image resolution bounded by a timeout

use crate::io::error::ResolutionFailure;
use crate::model::layer::ImageSource;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use std::future::Future;
use std::time::Duration;

/// Fetches the encoded bytes behind an image source
pub trait ImageLoader {
    /// Load the raw, still encoded bytes of `source`
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionFailure`] if the source cannot be read or fetched
    fn load(
        &self,
        source: &ImageSource,
    ) -> impl Future<Output = Result<Vec<u8>, ResolutionFailure>> + Send;
}

/// Loader for filesystem paths, `http(s)` URLs and embedded bytes
#[derive(Clone, Debug, Default)]
pub struct SourceLoader {
    client: reqwest::Client,
}

impl SourceLoader {
    /// Create a loader with a fresh HTTP client
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageLoader for SourceLoader {
    fn load(
        &self,
        source: &ImageSource,
    ) -> impl Future<Output = Result<Vec<u8>, ResolutionFailure>> + Send {
        let client = self.client.clone();
        let source = source.clone();

        async move {
            match source {
                ImageSource::Path(path) => {
                    tokio::fs::read(&path)
                        .await
                        .map_err(|e| ResolutionFailure::Io {
                            location: path.display().to_string(),
                            source: e,
                        })
                }
                ImageSource::Url(url) => {
                    let fetch_failure = |e: reqwest::Error| ResolutionFailure::Fetch {
                        location: url.clone(),
                        reason: e.to_string(),
                    };
                    let response = client
                        .get(&url)
                        .send()
                        .await
                        .and_then(reqwest::Response::error_for_status)
                        .map_err(fetch_failure)?;
                    let bytes = response.bytes().await.map_err(fetch_failure)?;
                    Ok(bytes.to_vec())
                }
                ImageSource::Embedded(bytes) => Ok(bytes.to_vec()),
            }
        }
    }
}

/// Decode encoded bytes and stretch the result to exactly `width` x `height`
///
/// # Errors
///
/// Returns the decoder error if the bytes are not a supported image
pub fn decode_to_fit(bytes: &[u8], width: u32, height: u32) -> image::ImageResult<RgbaImage> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();

    if decoded.dimensions() == (width, height) {
        Ok(decoded)
    } else {
        Ok(imageops::resize(&decoded, width, height, FilterType::Triangle))
    }
}

/// Load, decode and scale one layer image within `limit`
///
/// Decoding runs on the blocking pool so the time limit covers it as well as
/// the fetch.
///
/// # Errors
///
/// Returns a [`ResolutionFailure`] on timeout, load failure or decode failure
pub async fn resolve_image<L: ImageLoader>(
    loader: &L,
    source: &ImageSource,
    dimensions: (u32, u32),
    limit: Duration,
) -> Result<RgbaImage, ResolutionFailure> {
    let location = source.to_string();
    let (width, height) = dimensions;

    let resolution = async {
        let bytes = loader.load(source).await?;
        let decode_location = location.clone();

        match tokio::task::spawn_blocking(move || decode_to_fit(&bytes, width, height)).await {
            Ok(Ok(image)) => Ok(image),
            Ok(Err(e)) => Err(ResolutionFailure::Decode {
                location: decode_location,
                source: e,
            }),
            Err(_join_error) => Err(ResolutionFailure::Interrupted {
                location: decode_location,
            }),
        }
    };

    match tokio::time::timeout(limit, resolution).await {
        Ok(result) => result,
        Err(_elapsed) => Err(ResolutionFailure::Timeout {
            location,
            after: limit,
        }),
    }
}
