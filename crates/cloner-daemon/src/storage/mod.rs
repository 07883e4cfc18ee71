use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::Region, error::DisplayErrorContext, primitives::ByteStream, types::ObjectCannedAcl,
    Client,
};
use cloner_common::{ClonerError, Result};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

use crate::error::UploadError;

pub mod config;

/// A single object write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    /// Local file streamed as the object body
    pub path: PathBuf,
    pub acl: String,
    /// Sent as `Content-Type` when non-empty
    pub content_type: String,
}

/// Durable object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, request: PutObject) -> std::result::Result<(), UploadError>;
}

/// S3 (or S3-compatible) object store
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    pub async fn new(config: &config::StorageConfig) -> Result<Self> {
        config.validate().map_err(ClonerError::Storage)?;

        debug!("Initializing storage with config: {:?}", config);

        let mut builder = if config.has_static_credentials() {
            let credentials =
                Credentials::new(&config.key, &config.secret, None, None, "media-cloner");
            aws_sdk_s3::Config::builder().credentials_provider(credentials)
        } else {
            let shared = aws_config::defaults(BehaviorVersion::latest()).load().await;
            aws_sdk_s3::config::Builder::from(&shared)
        };

        builder = builder
            .region(Region::new(config.region.clone()))
            .force_path_style(config.path_style);

        if let Some(endpoint) = config.endpoint() {
            builder = builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(builder.build());

        info!(
            provider = %config.name,
            bucket = %config.bucket,
            "Storage client initialized"
        );

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    #[instrument(skip(self, request), fields(bucket = %request.bucket, key = %request.key))]
    async fn put_object(&self, request: PutObject) -> std::result::Result<(), UploadError> {
        let body = ByteStream::from_path(&request.path)
            .await
            .map_err(std::io::Error::other)?;

        debug!(
            "Uploading {} to s3://{}{}",
            request.path.display(),
            request.bucket,
            request.key
        );

        let mut put = self
            .client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .acl(ObjectCannedAcl::from(request.acl.as_str()))
            .body(body);

        if !request.content_type.is_empty() {
            put = put.content_type(&request.content_type);
        }

        put.send().await.map_err(|e| UploadError::ObjectStore {
            key: request.key.clone(),
            message: DisplayErrorContext(&e).to_string(),
        })?;

        info!("Successfully uploaded to s3://{}{}", request.bucket, request.key);

        Ok(())
    }
}
