//! Error types for collaborators and sweeps

use crate::resource::ResourceKind;
use thiserror::Error;

/// Failures reported by a cloud collaborator (listing, deletion, credentials)
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;

/// Reasons a single sweep aborts.
///
/// Every variant ends the sweep it occurred in; sibling sweeps and other
/// projects keep running.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("couldn't parse creation timestamp {timestamp:?} of {name:?}: {source}")]
    Parse {
        name: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("failed to delete {kind} {name:?}: {source}")]
    Deletion {
        kind: ResourceKind,
        name: String,
        #[source]
        source: CloudError,
    },

    #[error("failed to delete dns records {start}..{end} of {total}: {source}")]
    BatchDeletion {
        start: usize,
        end: usize,
        total: usize,
        #[source]
        source: CloudError,
    },

    #[error("failed to list {kind}: {source}")]
    Pagination {
        kind: ResourceKind,
        #[source]
        source: CloudError,
    },
}
