//! Error types for collection generation runs and per-layer image resolution

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Main error type for all generation operations
///
/// Every variant except the parameter and filesystem ones aborts the run: the
/// executor never hands back a partially packaged archive.
#[derive(Debug)]
pub enum GenerationError {
    /// A layer cannot be sampled
    ///
    /// Occurs when the layer set is empty, or when a layer has:
    /// - No items at all
    /// - Only zero-weight items
    InvalidLayerConfiguration {
        /// Name of the offending layer
        layer: String,
        /// Description of what's wrong with the layer
        reason: String,
    },

    /// The composited surface could not be serialized to an image
    EncodingFailed {
        /// Zero-based index of the artifact being encoded
        artifact: usize,
        /// Description of the encoder failure
        reason: String,
    },

    /// The resample loop could not find an unseen combination
    UniquenessExhausted {
        /// Number of artifacts the run was asked for
        requested: usize,
        /// Number of artifacts produced before giving up
        generated: usize,
        /// Sampling attempts spent on the failing artifact
        attempts: usize,
        /// Distinct combinations the layer set admits, `None` when unbounded
        combination_space: Option<u128>,
    },

    /// The run was cancelled between artifacts
    Cancelled {
        /// Number of artifacts produced before cancellation was observed
        generated: usize,
    },

    /// The executor was driven again after a fatal failure
    RunAborted,

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A layer manifest could not be parsed
    Manifest {
        /// Path to the manifest file
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// A report or metadata record could not be serialized
    Serialization {
        /// What was being serialized
        what: &'static str,
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLayerConfiguration { layer, reason } => {
                write!(f, "Invalid layer configuration for '{layer}': {reason}")
            }
            Self::EncodingFailed { artifact, reason } => {
                write!(f, "Failed to encode artifact #{}: {reason}", artifact + 1)
            }
            Self::UniquenessExhausted {
                requested,
                generated,
                attempts,
                combination_space,
            } => {
                let space = combination_space
                    .map_or_else(|| "unbounded".to_string(), |space| space.to_string());
                write!(
                    f,
                    "Uniqueness exhausted after {attempts} attempts: generated {generated} of {requested} (combination space {space})"
                )
            }
            Self::Cancelled { generated } => {
                write!(f, "Generation cancelled after {generated} artifacts")
            }
            Self::RunAborted => {
                write!(f, "Generation run already failed and cannot continue")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Manifest { path, source } => {
                write!(f, "Failed to parse manifest '{}': {source}", path.display())
            }
            Self::Serialization { what, source } => {
                write!(f, "Failed to serialize {what}: {source}")
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } => Some(source),
            Self::Manifest { source, .. } | Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerationError {
    GenerationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid layer configuration error
pub fn invalid_layer(layer: &str, reason: &impl ToString) -> GenerationError {
    GenerationError::InvalidLayerConfiguration {
        layer: layer.to_string(),
        reason: reason.to_string(),
    }
}

/// Why a single layer image could not be resolved
///
/// Never fatal: the compositor logs it and leaves that layer's pixels out.
#[derive(Debug)]
pub enum ResolutionFailure {
    /// Fetch and decode did not finish within the allowed time
    Timeout {
        /// Description of the image source
        location: String,
        /// Time limit that was exceeded
        after: Duration,
    },

    /// The source could not be read from disk
    Io {
        /// Description of the image source
        location: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The source could not be fetched over the network
    Fetch {
        /// Description of the image source
        location: String,
        /// Transport or status failure
        reason: String,
    },

    /// The fetched bytes are not a decodable image
    Decode {
        /// Description of the image source
        location: String,
        /// Underlying decoder error
        source: image::ImageError,
    },

    /// The background decode task was interrupted
    Interrupted {
        /// Description of the image source
        location: String,
    },
}

impl ResolutionFailure {
    /// Description of the source that failed
    pub fn location(&self) -> &str {
        match self {
            Self::Timeout { location, .. }
            | Self::Io { location, .. }
            | Self::Fetch { location, .. }
            | Self::Decode { location, .. }
            | Self::Interrupted { location } => location,
        }
    }
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { location, after } => {
                write!(
                    f,
                    "Timed out after {}ms resolving '{location}'",
                    after.as_millis()
                )
            }
            Self::Io { location, source } => {
                write!(f, "Failed to read '{location}': {source}")
            }
            Self::Fetch { location, reason } => {
                write!(f, "Failed to fetch '{location}': {reason}")
            }
            Self::Decode { location, source } => {
                write!(f, "Failed to decode '{location}': {source}")
            }
            Self::Interrupted { location } => {
                write!(f, "Decoding '{location}' was interrupted")
            }
        }
    }
}

impl std::error::Error for ResolutionFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}
