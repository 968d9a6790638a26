//! Error types for the batch driver.

use std::path::PathBuf;

use layered_narrative::NarrativeError;
use layered_quote_features::FeatureError;
use thiserror::Error;

/// Errors that can occur while loading, processing or writing documents.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Reading or writing a file failed.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON input could not be parsed or an artifact could not be encoded.
    #[error("{path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The TOML configuration is invalid.
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Narrative(#[from] NarrativeError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// The worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl BatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BatchError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        BatchError::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;
