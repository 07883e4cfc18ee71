//! Relational store access
//!
//! The `files` table is owned by the aggregator that discovers media; the
//! cloner only reads pending rows and writes outcomes back.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use cloner_common::{ClonerError, LifecycleState};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::ingest::models::Item;

pub type StoreResult<T> = Result<T, StoreError>;

/// Values written back for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub file_id: i64,
    pub mime_type: String,
    /// `-1` when the transport reported no length
    pub file_size: i64,
    /// Empty until the item has been uploaded
    pub storage_reference: String,
    pub state: LifecycleState,
    pub modified_at: NaiveDateTime,
}

/// Pending-item listing and outcome recording
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Pending rows created within the last `window_hours`, newest first
    async fn list_pending(&self, window_hours: u32) -> StoreResult<Vec<Item>>;

    /// Write the outcome and bump the attempt counter by one
    async fn record_outcome(&self, outcome: &OutcomeRecord) -> StoreResult<()>;
}

/// Open the shared pool; failure here is fatal at start-up
pub async fn connect(config: &DatabaseConfig) -> cloner_common::Result<MySqlPool> {
    let (host, port) = config.host_and_port()?;

    let options = MySqlConnectOptions::new()
        .host(&host)
        .port(port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.db_name)
        .charset("utf8mb4");

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout())
        .connect_with(options)
        .await
        .map_err(|e| ClonerError::Database(format!("could not open db connection: {}", e)))?;

    info!(host = %host, port, database = %config.db_name, "Opened database connection");

    Ok(pool)
}

#[derive(Debug, sqlx::FromRow)]
struct PendingRow {
    pk_file_id: i64,
    fk_post_id: i64,
    external_url: String,
    state: String,
    created: NaiveDateTime,
    attempts: i64,
}

impl TryFrom<PendingRow> for Item {
    type Error = StoreError;

    fn try_from(row: PendingRow) -> Result<Self, Self::Error> {
        let external_url = Url::parse(&row.external_url).map_err(|source| StoreError::InvalidUrl {
            file_id: row.pk_file_id,
            url: row.external_url.clone(),
            source,
        })?;

        let state = row.state.parse::<LifecycleState>().map_err(|_| StoreError::InvalidState {
            file_id: row.pk_file_id,
            state: row.state.clone(),
        })?;

        let mut item = Item::new(
            row.pk_file_id,
            row.fk_post_id,
            external_url,
            row.created,
            row.attempts,
        );
        item.state = state;

        Ok(item)
    }
}

/// MySQL-backed repository over the `files` table
#[derive(Clone)]
pub struct MySqlItemRepository {
    pool: MySqlPool,
}

impl MySqlItemRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for MySqlItemRepository {
    #[instrument(skip(self))]
    async fn list_pending(&self, window_hours: u32) -> StoreResult<Vec<Item>> {
        let rows: Vec<PendingRow> = sqlx::query_as(
            r#"
            SELECT
                CAST(pk_file_id AS SIGNED) AS pk_file_id,
                CAST(fk_post_id AS SIGNED) AS fk_post_id,
                external_url,
                CAST(state AS CHAR) AS state,
                created,
                CAST(attempts AS SIGNED) AS attempts
            FROM files
            WHERE state = ?
              AND created >= NOW() - INTERVAL ? HOUR
            ORDER BY created DESC
            "#,
        )
        .bind(LifecycleState::Pending.as_str())
        .bind(window_hours)
        .fetch_all(&self.pool)
        .await?;

        debug!(rows = rows.len(), "Fetched pending rows");

        rows.into_iter().map(Item::try_from).collect()
    }

    #[instrument(skip(self, outcome), fields(file_id = outcome.file_id, state = %outcome.state))]
    async fn record_outcome(&self, outcome: &OutcomeRecord) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE files
            SET mime_type = ?,
                file_size = ?,
                ingested_uri = ?,
                state = ?,
                modified = ?,
                attempts = attempts + 1
            WHERE pk_file_id = ?
            "#,
        )
        .bind(&outcome.mime_type)
        .bind(outcome.file_size)
        .bind(&outcome.storage_reference)
        .bind(outcome.state.as_str())
        .bind(outcome.modified_at)
        .bind(outcome.file_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(outcome.file_id));
        }

        Ok(())
    }
}
