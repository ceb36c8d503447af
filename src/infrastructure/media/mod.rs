//! Object storage for uploaded profile images
//!
//! Backed by the `object_store` abstraction, so the same code serves a
//! local directory in development and an S3-compatible bucket in
//! production. Image bytes live in the store; the users table only
//! references them by URL.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use tracing::info;

use crate::config::MediaSettings;
use crate::domain::{DomainError, DomainResult};

/// Media store handle: an object store plus the public base URL under
/// which its keys are reachable.
pub struct MediaStore {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
}

impl MediaStore {
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into(),
        }
    }

    /// Build the configured backend ("local" or "s3")
    pub fn from_settings(settings: &MediaSettings) -> DomainResult<Self> {
        let store: Arc<dyn ObjectStore> = match settings.backend.as_str() {
            "s3" => {
                let mut builder = AmazonS3Builder::new()
                    .with_bucket_name(&settings.s3.bucket)
                    .with_allow_http(settings.s3.allow_http);
                if let Some(ref region) = settings.s3.region {
                    builder = builder.with_region(region);
                }
                if let Some(ref endpoint) = settings.s3.endpoint {
                    builder = builder.with_endpoint(endpoint);
                }
                if let Some(ref access_key_id) = settings.s3.access_key_id {
                    builder = builder.with_access_key_id(access_key_id);
                }
                if let Some(ref secret_access_key) = settings.s3.secret_access_key {
                    builder = builder.with_secret_access_key(secret_access_key);
                }
                let s3 = builder
                    .build()
                    .map_err(|e| DomainError::Storage(format!("S3 backend init failed: {}", e)))?;
                info!("Media store: s3 bucket {}", settings.s3.bucket);
                Arc::new(s3)
            }
            _ => {
                std::fs::create_dir_all(&settings.local_dir).map_err(|e| {
                    DomainError::Storage(format!(
                        "Failed to create media dir {}: {}",
                        settings.local_dir, e
                    ))
                })?;
                let local = LocalFileSystem::new_with_prefix(&settings.local_dir)
                    .map_err(|e| DomainError::Storage(format!("Local backend init failed: {}", e)))?;
                info!("Media store: local dir {}", settings.local_dir);
                Arc::new(local)
            }
        };

        Ok(Self::new(store, settings.public_base_url.trim_end_matches('/')))
    }

    /// Store image bytes under `uploads/<unix-timestamp>_<filename>` and
    /// return the public URL.
    pub async fn put_image(&self, original_filename: &str, data: Bytes) -> DomainResult<String> {
        let key = format!(
            "uploads/{}_{}",
            Utc::now().timestamp(),
            sanitize_filename(original_filename)
        );
        let location = ObjectPath::from(key.clone());

        self.store
            .put(&location, PutPayload::from(data))
            .await
            .map_err(|e| DomainError::Storage(format!("Object store put failed: {}", e)))?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

/// Keep alphanumerics, dots, dashes and underscores; everything else
/// becomes an underscore. An empty name falls back to "image".
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('_').is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
