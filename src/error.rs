// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SocIndexError {
    /// Malformed or contradictory input. The call is aborted before any effect.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An internal invariant does not hold (inconsistent dimensions, zero normalizer).
    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Input error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SocIndexError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SocIndexError>;

// Allow `?` on std::io::Error by converting to SocIndexError::Io with unknown path.
impl From<std::io::Error> for SocIndexError {
    fn from(source: std::io::Error) -> Self {
        SocIndexError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
