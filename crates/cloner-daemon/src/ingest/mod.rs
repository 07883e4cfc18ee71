//! Media ingestion pipeline
//!
//! # Architecture
//!
//! - **source**: pending rows inside the recency window
//! - **fetcher**: HTTP download, content classification and local staging
//! - **uploader**: staged artifact to object store under a date-partitioned key
//! - **recorder**: outcome write-back, the only place attempts advance
//! - **notifier**: best-effort search index update
//! - **janitor**: removal of staged artifacts after retrieval
//! - **orchestrator**: one run, with the retry/failure state machine
//! - **scheduler**: immediate first run, fixed interval after, no overlap

pub mod config;
pub mod fetcher;
pub mod janitor;
pub mod models;
pub mod notifier;
pub mod orchestrator;
pub mod recorder;
pub mod scheduler;
pub mod source;
pub mod uploader;

pub use config::IngestConfig;
pub use fetcher::ContentFetcher;
pub use janitor::LocalArtifactJanitor;
pub use models::Item;
pub use notifier::SearchIndexNotifier;
pub use orchestrator::{Disposition, IngestionOrchestrator, RunSummary};
pub use recorder::ItemStateRecorder;
pub use scheduler::{RunGuard, RunScheduler};
pub use source::PendingItemSource;
pub use uploader::ObjectStoreUploader;
