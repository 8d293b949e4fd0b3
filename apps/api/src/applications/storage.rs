//! Object storage for uploaded CV files.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },

    #[error("download of '{key}' failed: {message}")]
    Download { key: String, message: String },

    #[error("delete of '{key}' failed: {message}")]
    Delete { key: String, message: String },
}

#[async_trait]
pub trait CvStorage: Send + Sync {
    /// Stores `data` under `key`.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError>;

    /// Reads the object back; `None` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// S3 / MinIO bucket store.
pub struct S3CvStorage {
    client: S3Client,
    bucket: String,
}

impl S3CvStorage {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl CvStorage for S3CvStorage {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        info!("Uploaded CV ({size} bytes) to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None)
            }
            Err(e) => {
                return Err(StorageError::Download {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Download {
                key: key.to_string(),
                message: e.to_string(),
            })?
            .into_bytes();
        Ok(Some(data))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        info!("Deleted s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
