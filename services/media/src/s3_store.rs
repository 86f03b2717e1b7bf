use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{Client, error::DisplayErrorContext, primitives::ByteStream};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    config::MediaConfig,
    error::MediaError,
    models::{MediaKind, MediaStore, StoredMedia},
    thumbnail::thumbnail_key,
};

/// [`MediaStore`] backed by an S3-compatible bucket
#[derive(Clone)]
pub struct S3MediaStore {
    s3_client: Client,
    config: MediaConfig,
}

impl S3MediaStore {
    pub fn new(s3_client: Client, config: MediaConfig) -> Self {
        Self { s3_client, config }
    }

    /// Build a client from the ambient AWS configuration
    pub async fn from_config(config: MediaConfig) -> Self {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint_url {
            info!("Using custom S3 endpoint: {}", endpoint);
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()), config)
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.config.public_base_url, key)
    }

    fn validate(&self, kind: MediaKind, content_type: &str, size: usize) -> Result<(), MediaError> {
        if size == 0 {
            return Err(MediaError::Empty);
        }
        if size > self.config.max_upload_bytes {
            return Err(MediaError::TooLarge {
                size,
                limit: self.config.max_upload_bytes,
            });
        }
        if !kind.accepts(content_type) {
            return Err(MediaError::UnsupportedType {
                kind: kind.to_string(),
                content_type: content_type.to_string(),
            });
        }
        Ok(())
    }

    async fn put_with_retry(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), MediaError> {
        let max_attempts = self.config.upload_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let result = self
                .s3_client
                .put_object()
                .bucket(&self.config.bucket_name)
                .key(key)
                .content_type(content_type)
                .body(ByteStream::from(bytes.clone()))
                .send()
                .await;

            match result {
                Ok(_) => return Ok(()),
                Err(e) if attempt < max_attempts => {
                    warn!(
                        "Upload of {} failed (attempt {}/{}): {}",
                        key,
                        attempt,
                        max_attempts,
                        DisplayErrorContext(&e)
                    );
                    // Exponential backoff: 1s, 2s, 4s...
                    sleep(Duration::from_secs(1 << (attempt - 1).min(5))).await;
                }
                Err(e) => {
                    error!("Upload of {} failed after {} attempts", key, attempt);
                    return Err(MediaError::Upload(DisplayErrorContext(&e).to_string()));
                }
            }
        }
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(
        &self,
        kind: MediaKind,
        owner: Uuid,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredMedia, MediaError> {
        let size = bytes.len();
        self.validate(kind, content_type, size)?;

        let key = kind.object_key(owner, file_name, content_type);
        info!("Uploading {} ({} bytes) to {}", kind, size, key);
        self.put_with_retry(&key, content_type, bytes).await?;

        Ok(StoredMedia {
            url: self.public_url(&key),
            thumbnail_url: thumbnail_key(kind, &key).map(|thumb| self.public_url(&thumb)),
            key,
            size,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), MediaError> {
        info!("Deleting media object {}", key);
        self.s3_client
            .delete_object()
            .bucket(&self.config.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| MediaError::Delete(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.config.public_base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }
}
