//! Object store operations
//!
//! The bucket layout the pipeline relies on:
//!
//! | Prefix              | Written by        | Triggers          |
//! |---------------------|-------------------|-------------------|
//! | `routes_from_api/`  | route fetcher     | CSV transformer   |
//! | `routes_csv/`       | CSV transformer   | notifier          |
//! | `logs/`             | activity log      | nothing           |

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;

use crate::errors::{Error, Result};

/// Durable key/value blob storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` under `key`, replacing any existing object
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    /// Read the full body of an object; `Error::ObjectNotFound` if absent
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Server-side copy within a bucket
    async fn copy_object(&self, bucket: &str, source_key: &str, dest_key: &str) -> Result<()>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}

/// S3-backed object store
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("put {}/{}: {}", bucket, key, e)))?;

        debug!(bucket = %bucket, key = %key, size = size, "Stored object");
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    Error::ObjectNotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    Error::Storage(format!("get {}/{}: {}", bucket, key, e))
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| Error::Storage(format!("read {}/{}: {}", bucket, key, e)))?;

        Ok(data.into_bytes().to_vec())
    }

    async fn copy_object(&self, bucket: &str, source_key: &str, dest_key: &str) -> Result<()> {
        self.client
            .copy_object()
            .bucket(bucket)
            .copy_source(format!("{}/{}", bucket, source_key))
            .key(dest_key)
            .send()
            .await
            .map_err(|e| {
                Error::Storage(format!(
                    "copy {}/{} to {}: {}",
                    bucket, source_key, dest_key, e
                ))
            })?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("delete {}/{}: {}", bucket, key, e)))?;

        Ok(())
    }
}
