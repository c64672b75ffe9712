//! Error types for the scraper pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Odds conversion failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OddsError {
    #[error("invalid decimal odds {0}: must be a finite number greater than 1.0")]
    InvalidOdds(f64),
}

/// Page fetch failure
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },
}

impl TransportError {
    /// Whether a retry has a chance of succeeding
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Status { status, .. } => *status == 429 || *status >= 500,
            TransportError::Network { .. } | TransportError::Timeout { .. } => true,
        }
    }
}

/// Persisted dataset failure
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tabular error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("missing column {0}")]
    MissingColumn(&'static str),

    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

/// Run-level failure
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("index fetch failed: {0}")]
    IndexFetch(#[source] TransportError),

    #[error("could not persist dataset: {0}")]
    Persist(#[source] StoreError),
}
