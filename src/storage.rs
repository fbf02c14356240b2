use std::time::Duration;

use async_trait::async_trait;
use axum::http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use serde::Serialize;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub upload_url: String,
    pub key: String,
    pub public_url: String,
    pub expires_in: u64,
}

#[async_trait]
pub trait UploadSigner: Send + Sync {
    /// Returns a pre-signed `PUT` URL for `key`.
    async fn presign_put(&self, key: &str) -> Result<PresignedUpload, AppError>;
}

pub struct S3UploadSigner {
    store: AmazonS3,
    public_base: String,
    ttl: Duration,
}

impl S3UploadSigner {
    pub fn new(config: &StorageConfig) -> Result<Self, AppError> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key);

        let public_base = match &config.endpoint {
            Some(endpoint) => {
                builder = builder.with_endpoint(endpoint);
                format!("{}/{}", endpoint.trim_end_matches('/'), config.bucket)
            }
            None => format!(
                "https://{}.s3.{}.amazonaws.com",
                config.bucket, config.region
            ),
        };

        Ok(Self {
            store: builder.build()?,
            public_base,
            ttl: config.url_ttl,
        })
    }
}

#[async_trait]
impl UploadSigner for S3UploadSigner {
    async fn presign_put(&self, key: &str) -> Result<PresignedUpload, AppError> {
        let path = Path::from(key);
        let url = self.store.signed_url(Method::PUT, &path, self.ttl).await?;

        Ok(PresignedUpload {
            upload_url: url.to_string(),
            key: key.to_string(),
            public_url: format!("{}/{}", self.public_base, key),
            expires_in: self.ttl.as_secs(),
        })
    }
}

/// Builds `<folder>/<uuid>-<name>` with the file name reduced to a safe character set.
pub fn object_key(folder: &str, file_name: &str) -> String {
    let folder = sanitize(folder.trim_matches('/'));
    let name = sanitize(file_name);
    let folder = if folder.is_empty() { "uploads".to_string() } else { folder };
    let name = if name.trim_matches('.').is_empty() { "file".to_string() } else { name };
    format!("{}/{}-{}", folder, Uuid::new_v4(), name)
}

fn sanitize(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    cleaned.trim_matches('-').to_string()
}
