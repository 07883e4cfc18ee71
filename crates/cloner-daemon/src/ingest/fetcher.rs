//! Content fetcher
//!
//! Downloads one item's bytes over HTTP, resolves its extension and stages
//! the body in the staging directory under a collision-free name.

use chrono::Utc;
use cloner_common::types::{extension_for_mime, extension_from_path};
use cloner_common::ContentCategory;
use futures::StreamExt;
use reqwest::{header::CONTENT_TYPE, Client};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::models::{artifact_name, Item};
use crate::error::FetchError;

/// Extension for a served `Content-Type`, or the URL path suffix when none was sent
pub fn resolve_extension(mime_type: &str, url: &Url) -> Option<String> {
    if mime_type.is_empty() {
        return extension_from_path(url.path());
    }

    extension_for_mime(mime_type).map(str::to_string)
}

pub struct ContentFetcher {
    client: Client,
    staging_dir: PathBuf,
}

impl ContentFetcher {
    /// Every request, including the body read, is bounded by `timeout`
    pub fn new(timeout: Duration, staging_dir: impl Into<PathBuf>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("media-cloner/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            staging_dir: staging_dir.into(),
        })
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Fetch and stage `item`, filling in its content metadata and local path
    ///
    /// Nothing is left on disk when this returns an error.
    #[instrument(skip(self, item), fields(file_id = item.file_id, url = %item.external_url))]
    pub async fn fetch(&self, item: &mut Item) -> Result<(), FetchError> {
        let response = self
            .client
            .get(item.external_url.clone())
            .send()
            .await?
            .error_for_status()?;

        item.mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();
        item.byte_size = response.content_length();

        let extension = resolve_extension(&item.mime_type, &item.external_url);
        item.content_category = Some(ContentCategory::classify(
            &item.mime_type,
            extension.as_deref(),
        ));

        let Some(extension) = extension else {
            return Err(FetchError::InvalidMimeType(item.mime_type.clone()));
        };

        let name = artifact_name(
            Utc::now().timestamp(),
            item.file_id,
            item.post_id,
            &extension,
        );
        let path = self.staging_dir.join(&name);

        debug!("Staging {} to {}", item.external_url, path.display());

        if let Err(e) = stream_to_file(response, &path).await {
            if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                if remove_err.kind() != std::io::ErrorKind::NotFound {
                    warn!(
                        "Failed to remove partial artifact {}: {}",
                        path.display(),
                        remove_err
                    );
                }
            }
            return Err(e);
        }

        info!(
            mime_type = %item.mime_type,
            bytes = ?item.byte_size,
            "Staged {}",
            name
        );

        item.file_extension = Some(extension);
        item.local_artifact_name = Some(name);
        item.local_path = Some(path);

        Ok(())
    }
}

async fn stream_to_file(response: reqwest::Response, path: &Path) -> Result<(), FetchError> {
    let mut file = File::create(path).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }

    file.flush().await?;

    Ok(())
}
