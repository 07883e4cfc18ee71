//! Ingestion orchestrator
//!
//! Drives one run: list pending items, push each through
//! fetch → upload → record → notify, then remove the staged copies of
//! everything that was retrieved.
//!
//! Per-item failures are isolated. Only a listing failure aborts the run.

use cloner_common::{ClonerError, LifecycleState};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use super::{
    config::IngestConfig, fetcher::ContentFetcher, janitor::LocalArtifactJanitor, models::Item,
    notifier::SearchIndexNotifier, recorder::ItemStateRecorder, source::PendingItemSource,
    uploader::ObjectStoreUploader,
};
use crate::config::Config;
use crate::db::ItemRepository;
use crate::error::RunError;
use crate::storage::ObjectStore;

/// How one item left the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Uploaded; `recorded` is false when the store write failed
    Retrieved { recorded: bool },
    /// Fetch failed below the attempt ceiling; still pending
    Retried,
    /// Fetch failed at the attempt ceiling
    Failed,
    /// Upload failed; staged copy kept
    UploadFailed,
    /// The failure outcome could not be written back
    RecordFailed,
}

/// Counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub listed: usize,
    pub retrieved: usize,
    pub retried: usize,
    pub failed: usize,
    pub upload_failures: usize,
    pub record_failures: usize,
    pub cleaned: usize,
}

impl RunSummary {
    fn tally(&mut self, disposition: Disposition) {
        match disposition {
            Disposition::Retrieved { recorded } => {
                self.retrieved += 1;
                if !recorded {
                    self.record_failures += 1;
                }
            },
            Disposition::Retried => self.retried += 1,
            Disposition::Failed => self.failed += 1,
            Disposition::UploadFailed => self.upload_failures += 1,
            Disposition::RecordFailed => self.record_failures += 1,
        }
    }
}

struct ProcessedItem {
    item: Item,
    disposition: Disposition,
    notification: Option<JoinHandle<()>>,
}

pub struct IngestionOrchestrator {
    source: PendingItemSource,
    fetcher: ContentFetcher,
    uploader: ObjectStoreUploader,
    recorder: ItemStateRecorder,
    notifier: SearchIndexNotifier,
    janitor: LocalArtifactJanitor,
    config: IngestConfig,
}

impl IngestionOrchestrator {
    /// Wire the pipeline from daemon configuration and the two backing stores
    pub fn from_config(
        config: &Config,
        repo: Arc<dyn ItemRepository>,
        store: Arc<dyn ObjectStore>,
    ) -> cloner_common::Result<Self> {
        let ingest = config.ingest.clone();

        let fetcher = ContentFetcher::new(ingest.fetch_timeout(), ingest.staging_dir.clone())
            .map_err(|e| ClonerError::config(format!("Failed to build fetch client: {}", e)))?;
        let notifier = SearchIndexNotifier::new(&config.solr, ingest.notify_timeout())
            .map_err(|e| ClonerError::config(format!("Failed to build index client: {}", e)))?;

        Ok(Self {
            source: PendingItemSource::new(repo.clone(), ingest.window_hours),
            fetcher,
            uploader: ObjectStoreUploader::new(store, &config.aws),
            recorder: ItemStateRecorder::new(repo),
            notifier,
            janitor: LocalArtifactJanitor::new(),
            config: ingest,
        })
    }

    /// Execute one run
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        let started = Instant::now();

        let items = match self.source.list_pending().await {
            Ok(items) => items,
            Err(e) => {
                error!("Run aborted: {}", e);
                return Err(e);
            },
        };

        let mut summary = RunSummary {
            listed: items.len(),
            ..Default::default()
        };

        let processed: Vec<ProcessedItem> = stream::iter(items)
            .map(|item| self.process_item(item))
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        let mut retrieved = Vec::new();
        for outcome in processed {
            summary.tally(outcome.disposition);

            if let Some(handle) = outcome.notification {
                if let Err(e) = handle.await {
                    warn!(file_id = outcome.item.file_id, "Notification task failed: {}", e);
                }
            }

            if outcome.item.state == LifecycleState::Retrieved {
                retrieved.push(outcome.item);
            }
        }

        summary.cleaned = self.janitor.sweep(&retrieved).await;

        info!(
            listed = summary.listed,
            retrieved = summary.retrieved,
            retried = summary.retried,
            failed = summary.failed,
            upload_failures = summary.upload_failures,
            record_failures = summary.record_failures,
            cleaned = summary.cleaned,
            "Run finished in {:.2}s",
            started.elapsed().as_secs_f64()
        );

        Ok(summary)
    }

    #[instrument(skip(self, item), fields(file_id = item.file_id, post_id = item.post_id))]
    async fn process_item(&self, mut item: Item) -> ProcessedItem {
        if let Err(e) = self.fetcher.fetch(&mut item).await {
            warn!("Could not fetch {}: {}", item.external_url, e);
            let disposition = self.record_failed_attempt(&mut item).await;
            return ProcessedItem {
                item,
                disposition,
                notification: None,
            };
        }

        let reference = match self.uploader.upload(&item).await {
            Ok(reference) => reference,
            Err(e) => {
                warn!("Could not upload {}: {}", item.external_url, e);
                let disposition = if self.config.count_upload_failures {
                    self.record_failed_attempt(&mut item).await
                } else {
                    Disposition::UploadFailed
                };
                return ProcessedItem {
                    item,
                    disposition,
                    notification: None,
                };
            },
        };

        info!("Uploaded {} as {}", item.external_url, reference);

        item.storage_reference = Some(reference);
        item.state = LifecycleState::Retrieved;

        let recorded = match self.recorder.record(&mut item).await {
            Ok(()) => true,
            Err(e) => {
                error!("Could not record retrieved state: {}", e);
                false
            },
        };

        let notification = Some(self.notifier.spawn(&item));

        ProcessedItem {
            item,
            disposition: Disposition::Retrieved { recorded },
            notification,
        }
    }

    /// Record a failed attempt, escalating to `failed` at the attempt ceiling
    async fn record_failed_attempt(&self, item: &mut Item) -> Disposition {
        let exhausted = item.attempts >= self.config.max_attempts;
        if exhausted {
            item.state = LifecycleState::Failed;
        }

        match self.recorder.record(item).await {
            Ok(()) if exhausted => {
                warn!(attempts = item.attempts, "Giving up on {}", item.external_url);
                Disposition::Failed
            },
            Ok(()) => Disposition::Retried,
            Err(e) => {
                error!("Could not record failed attempt: {}", e);
                Disposition::RecordFailed
            },
        }
    }
}
