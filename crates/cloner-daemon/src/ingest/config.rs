//! Ingestion configuration
//!
//! Every field is optional in the config file; the defaults reproduce the
//! behaviour the aggregator expects (2 hour window, 3 retries, 10 minute
//! cadence, one item at a time).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_WINDOW_HOURS: u32 = 2;
pub const DEFAULT_MAX_ATTEMPTS: i64 = 3;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_CONCURRENCY: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Only rows created within this many hours are selected
    pub window_hours: u32,
    /// A fetch failure with at least this many prior attempts marks the item failed
    pub max_attempts: i64,
    pub fetch_timeout_secs: u64,
    pub notify_timeout_secs: u64,
    /// Seconds between scheduled runs
    pub interval_secs: u64,
    /// Items processed concurrently within a run
    pub concurrency: usize,
    /// Where fetched bytes are staged before upload
    pub staging_dir: PathBuf,
    /// Treat upload failures like fetch failures (record + attempt ceiling)
    pub count_upload_failures: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            window_hours: DEFAULT_WINDOW_HOURS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            notify_timeout_secs: DEFAULT_NOTIFY_TIMEOUT_SECS,
            interval_secs: DEFAULT_INTERVAL_SECS,
            concurrency: DEFAULT_CONCURRENCY,
            staging_dir: PathBuf::from("."),
            count_upload_failures: false,
        }
    }
}

impl IngestConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.window_hours == 0 {
            return Err("Ingest window_hours must be greater than 0".to_string());
        }
        if self.max_attempts < 0 {
            return Err("Ingest max_attempts cannot be negative".to_string());
        }
        if self.fetch_timeout_secs == 0 || self.notify_timeout_secs == 0 {
            return Err("Ingest timeouts must be greater than 0".to_string());
        }
        if self.interval_secs == 0 {
            return Err("Ingest interval_secs must be greater than 0".to_string());
        }
        if self.concurrency == 0 {
            return Err("Ingest concurrency must be greater than 0".to_string());
        }

        Ok(())
    }
}
