//! Media Cloner Daemon Library
//!
//! Headless daemon that copies externally hosted media into object storage.
//!
//! # Overview
//!
//! Every run selects the recently discovered `pending` rows from the
//! aggregator's MySQL `files` table and, for each one:
//!
//! 1. downloads the media and stages it on local disk,
//! 2. uploads the staged file to an S3-compatible bucket,
//! 3. writes the outcome (type, size, object key, state, attempts) back,
//! 4. tells the search index about the new object key.
//!
//! Staged files of retrieved items are removed at the end of the run. Fetch
//! failures are retried on later runs until the attempt ceiling is reached,
//! after which the row is marked `failed`.
//!
//! # Example
//!
//! ```no_run
//! use cloner_daemon::{config::Config, db, ingest, storage};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::connect(&config.db).await?;
//!     let store = storage::S3Storage::new(&config.aws).await?;
//!     let orchestrator = ingest::IngestionOrchestrator::from_config(
//!         &config,
//!         Arc::new(db::MySqlItemRepository::new(pool)),
//!         Arc::new(store),
//!     )?;
//!     let summary = orchestrator.run().await?;
//!     println!("{:?}", summary);
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod storage;

pub use error::{FetchError, RunError, StoreError, UploadError};
