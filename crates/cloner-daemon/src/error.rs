//! Error types for the ingestion pipeline
//!
//! Each step of the per-item pipeline owns its error type so the orchestrator
//! can decide, per scope, whether a failure is recorded, logged, or aborts the
//! run.

use thiserror::Error;

/// Relational store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("File {file_id} has an unparseable external URL '{url}': {source}")]
    InvalidUrl {
        file_id: i64,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("File {file_id} has an unknown state '{state}'")]
    InvalidState { file_id: i64, state: String },

    #[error("No file row with id {0}")]
    NotFound(i64),
}

/// A run could not list its work and was abandoned
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to list pending items: {0}")]
    Listing(#[from] StoreError),
}

/// Retrieving or staging one item's bytes failed
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid mime type: {0}")]
    InvalidMimeType(String),

    #[error("Failed to stage artifact locally: {0}")]
    Io(#[from] std::io::Error),
}

/// Moving a staged artifact into the object store failed
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Item {0} has no staged artifact")]
    NotStaged(i64),

    #[error("Failed to open staged artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Object store rejected {key}: {message}")]
    ObjectStore { key: String, message: String },
}

/// Writing an item's outcome back failed
#[derive(Error, Debug)]
pub enum RecordError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Search index notification failed; logged only
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Item {0} has no storage reference to index")]
    MissingReference(i64),

    #[error("Index request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Index responded with status {0}")]
    Status(reqwest::StatusCode),
}

/// Removing a staged artifact failed
#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("Item {0} has no staged artifact")]
    NotStaged(i64),

    #[error("Failed to remove staged artifact: {0}")]
    Io(#[from] std::io::Error),
}
