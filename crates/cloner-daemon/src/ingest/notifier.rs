//! Search index notifier
//!
//! Pushes an atomic `set` update for the post's image field to the index's
//! update handler. Notification is best-effort: failures are logged and never
//! reach the item's recorded state.

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use super::models::Item;
use crate::error::NotifyError;

#[derive(Debug, Serialize)]
struct SetField<'a> {
    set: &'a str,
}

#[derive(Debug, Serialize)]
struct PartialUpdate<'a> {
    id: i64,
    post_image: SetField<'a>,
}

#[derive(Clone)]
pub struct SearchIndexNotifier {
    client: Client,
    update_url: String,
}

impl SearchIndexNotifier {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            update_url: format!("{}/update?commit=true", base_url.trim_end_matches('/')),
        })
    }

    pub fn update_url(&self) -> &str {
        &self.update_url
    }

    /// Send the update for one post, surfacing every failure
    #[instrument(skip(self))]
    pub async fn try_notify(&self, post_id: i64, reference: &str) -> Result<(), NotifyError> {
        let body = [PartialUpdate {
            id: post_id,
            post_image: SetField { set: reference },
        }];

        let response = self.client.post(&self.update_url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }

        debug!("Index updated");

        Ok(())
    }

    /// Notify for an uploaded item; errors are logged and swallowed
    pub async fn notify(&self, item: &Item) {
        let result = match item.storage_reference.as_deref() {
            Some(reference) => self.try_notify(item.post_id, reference).await,
            None => Err(NotifyError::MissingReference(item.file_id)),
        };

        if let Err(e) = result {
            warn!(
                file_id = item.file_id,
                post_id = item.post_id,
                "Search index notification failed: {}",
                e
            );
        }
    }

    /// Detached notification; the handle is only useful for observing completion
    pub fn spawn(&self, item: &Item) -> JoinHandle<()> {
        let notifier = self.clone();
        let item = item.clone();

        tokio::spawn(async move { notifier.notify(&item).await })
    }
}
