//! Shared fixtures for pipeline tests
//!
//! In-memory stand-ins for the relational and object stores so the whole
//! pipeline can run against wiremock origins without MySQL or S3.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use chrono::Utc;
use cloner_common::LifecycleState;
use cloner_daemon::{
    config::{Config, DatabaseConfig},
    db::{ItemRepository, OutcomeRecord, StoreResult},
    error::{StoreError, UploadError},
    ingest::{IngestConfig, Item},
    storage::{config::StorageConfig, ObjectStore, PutObject},
};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use url::Url;

pub const FOLDER: &str = "posts";
pub const BUCKET: &str = "media";

/// Repository over a vector of rows; records behave like the `UPDATE`
#[derive(Default)]
pub struct FakeRepository {
    rows: Mutex<Vec<Item>>,
    outcomes: Mutex<Vec<OutcomeRecord>>,
    listings: AtomicUsize,
    fail_listing: AtomicBool,
    fail_records: AtomicBool,
}

impl FakeRepository {
    pub fn insert(&self, item: Item) {
        self.rows.lock().unwrap().push(item);
    }

    pub fn fail_listing(&self) {
        self.fail_listing.store(true, Ordering::SeqCst);
    }

    pub fn fail_records(&self) {
        self.fail_records.store(true, Ordering::SeqCst);
    }

    /// Number of `list_pending` calls, one per run
    pub fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }

    pub fn outcomes(&self) -> Vec<OutcomeRecord> {
        self.outcomes.lock().unwrap().clone()
    }

    pub fn outcome_for(&self, file_id: i64) -> Option<OutcomeRecord> {
        self.outcomes()
            .into_iter()
            .find(|outcome| outcome.file_id == file_id)
    }

    /// Current `(state, attempts)` of a stored row
    pub fn row(&self, file_id: i64) -> (LifecycleState, i64) {
        let rows = self.rows.lock().unwrap();
        let row = rows.iter().find(|row| row.file_id == file_id).unwrap();
        (row.state, row.attempts)
    }
}

#[async_trait]
impl ItemRepository for FakeRepository {
    async fn list_pending(&self, _window_hours: u32) -> StoreResult<Vec<Item>> {
        self.listings.fetch_add(1, Ordering::SeqCst);

        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut));
        }

        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.state == LifecycleState::Pending)
            .cloned()
            .collect())
    }

    async fn record_outcome(&self, outcome: &OutcomeRecord) -> StoreResult<()> {
        if self.fail_records.load(Ordering::SeqCst) {
            return Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut));
        }

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.file_id == outcome.file_id)
            .ok_or(StoreError::NotFound(outcome.file_id))?;

        row.state = outcome.state;
        row.attempts += 1;
        self.outcomes.lock().unwrap().push(outcome.clone());

        Ok(())
    }
}

/// Object store that keeps the uploaded bytes in memory
#[derive(Default)]
pub struct FakeObjectStore {
    puts: Mutex<Vec<(PutObject, Vec<u8>)>>,
    fail: AtomicBool,
}

impl FakeObjectStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        store
    }

    pub fn puts(&self) -> Vec<(PutObject, Vec<u8>)> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn put_object(&self, request: PutObject) -> Result<(), UploadError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(UploadError::ObjectStore {
                key: request.key,
                message: "AccessDenied".to_string(),
            });
        }

        let body = tokio::fs::read(&request.path).await?;
        self.puts.lock().unwrap().push((request, body));

        Ok(())
    }
}

pub fn config(index_url: &str, staging_dir: &Path) -> Config {
    Config {
        db: DatabaseConfig {
            user: "cloner".to_string(),
            password: "cloner".to_string(),
            server: "localhost".to_string(),
            db_name: "rss_aggregator".to_string(),
            max_connections: 1,
            connect_timeout_secs: 1,
        },
        solr: index_url.to_string(),
        aws: StorageConfig {
            name: "fake".to_string(),
            key: String::new(),
            secret: String::new(),
            endpoint: String::new(),
            region: "us-east-1".to_string(),
            bucket: BUCKET.to_string(),
            folder: FOLDER.to_string(),
            acl: "public-read".to_string(),
            path_style: false,
        },
        ingest: IngestConfig {
            staging_dir: staging_dir.to_path_buf(),
            ..Default::default()
        },
    }
}

pub fn item(file_id: i64, post_id: i64, url: &str, attempts: i64) -> Item {
    Item::new(
        file_id,
        post_id,
        Url::parse(url).unwrap(),
        Utc::now().naive_utc(),
        attempts,
    )
}

pub fn staged_files(dir: &Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}
