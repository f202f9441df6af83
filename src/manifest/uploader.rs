use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use reqwest::{Client, Url};
use tracing::{info, warn};

use crate::catalog::FlowCatalog;
use crate::error::{AppError, AppResult, StorageError};

use super::body::{build_manifest, object_key};
use super::sign::{SigningKeys, sign_put};

/// Where manifests go and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTarget {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub prefix: String,
}

/// Uploads the flows manifest at most once over its lifetime.
#[derive(Debug)]
pub struct ManifestUploader {
    client: Client,
    target: StorageTarget,
    endpoint: String,
    uploaded: AtomicBool,
}

impl ManifestUploader {
    /// # Errors
    ///
    /// Returns `InvalidUrl` when the endpoint is not an absolute URL.
    pub fn new(client: Client, target: StorageTarget) -> AppResult<Self> {
        Url::parse(&target.endpoint).map_err(|err| {
            AppError::storage(StorageError::InvalidUrl {
                url: target.endpoint.clone(),
                source: err,
            })
        })?;
        let endpoint = target.endpoint.trim_end_matches('/').to_owned();
        Ok(Self {
            client,
            target,
            endpoint,
            uploaded: AtomicBool::new(false),
        })
    }

    #[must_use]
    pub fn is_uploaded(&self) -> bool {
        self.uploaded.load(Ordering::SeqCst)
    }

    /// Path-style object URL for `key`.
    #[must_use]
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.target.bucket, key)
    }

    /// Uploads the manifest for `catalog` unless this uploader already did.
    ///
    /// Returns the object key when an upload happened. A failed upload does
    /// not count, so the next call tries again.
    ///
    /// # Errors
    ///
    /// Returns a storage error when signing fails, the request cannot be
    /// sent, or the bucket rejects it.
    pub async fn upload_once(&self, catalog: &FlowCatalog) -> AppResult<Option<String>> {
        if self
            .uploaded
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(None);
        }
        match self.upload(catalog).await {
            Ok(key) => Ok(Some(key)),
            Err(err) => {
                self.uploaded.store(false, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    /// Like [`upload_once`](Self::upload_once) but only logs a failure.
    pub async fn publish(&self, catalog: &FlowCatalog) {
        match self.upload_once(catalog).await {
            Ok(Some(key)) => info!(bucket = %self.target.bucket, key = %key, "Manifest uploaded"),
            Ok(None) => {}
            Err(err) => warn!(bucket = %self.target.bucket, "Manifest upload failed: {}", err),
        }
    }

    async fn upload(&self, catalog: &FlowCatalog) -> AppResult<String> {
        let now = SystemTime::now();
        let local: DateTime<Local> = now.into();
        let created_at = now
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|since_epoch| since_epoch.as_secs_f64())
            .unwrap_or_default();
        let manifest = build_manifest(catalog, created_at);
        let body = serde_json::to_vec(&manifest)
            .map_err(|err| AppError::storage(StorageError::EncodeManifest { source: err }))?;

        let key = object_key(&self.target.prefix, local.naive_local());
        let url = self.object_url(&key);
        let keys = SigningKeys {
            access_key: &self.target.access_key,
            secret_key: &self.target.secret_key,
            region: &self.target.region,
        };
        let headers = sign_put(&url, &body, &keys, now)?;

        let mut request = self
            .client
            .put(&url)
            .header("Content-Type", "application/json");
        for (name, value) in &headers {
            request = request.header(name, value);
        }
        let response = request.body(body).send().await.map_err(|err| {
            AppError::storage(StorageError::UploadFailed {
                key: key.clone(),
                source: err,
            })
        })?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::storage(StorageError::UploadRejected {
                key,
                status: status.as_u16(),
                body: detail,
            }));
        }
        Ok(key)
    }
}
