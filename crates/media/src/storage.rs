//! Client for the remote object store / CDN.
//!
//! The store exposes two endpoints: a multipart `/upload` returning
//! `{secure_url, public_id}` and a `/destroy` acknowledging deletion. All
//! uploads are namespaced under a fixed project folder prefix so unrelated
//! tenants of the store never collide.

use serde::Deserialize;

use crate::MediaError;

/// Folder prefix applied to every upload.
const PROJECT_FOLDER: &str = "lms-project";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the remote media store.
#[derive(Debug, Clone)]
pub struct MediaStorageConfig {
    /// Base URL of the store API (e.g. `https://media.example.com/v1`).
    pub base_url: String,
    /// Bearer credential for the store API.
    pub api_key: String,
    /// Per-request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl MediaStorageConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `MEDIA_BASE_URL` is not set, signalling that media
    /// uploads are not configured.
    ///
    /// | Variable             | Required | Default |
    /// |----------------------|----------|---------|
    /// | `MEDIA_BASE_URL`     | yes      | —       |
    /// | `MEDIA_API_KEY`      | no       | `""`    |
    /// | `MEDIA_TIMEOUT_SECS` | no       | `30`    |
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("MEDIA_BASE_URL").ok()?;
        Some(Self {
            base_url,
            api_key: std::env::var("MEDIA_API_KEY").unwrap_or_default(),
            timeout_secs: std::env::var("MEDIA_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// A successfully stored asset: stable URL plus a deletable identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    #[serde(rename = "secure_url")]
    pub url: String,
    pub public_id: String,
}

/// Remote object-store client.
pub struct MediaStorage {
    client: reqwest::Client,
    config: MediaStorageConfig,
}

impl MediaStorage {
    pub fn new(config: MediaStorageConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Upload `bytes` into `folder` (namespaced under the project prefix).
    ///
    /// Rejects empty input and empty remote responses with
    /// [`MediaError::BadUpload`].
    pub async fn upload(&self, bytes: Vec<u8>, folder: &str) -> Result<UploadedAsset, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::BadUpload("upload buffer is empty".into()));
        }

        let part = reqwest::multipart::Part::bytes(bytes).file_name("upload");
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("folder", format!("{PROJECT_FOLDER}/{folder}"));

        let response = self
            .client
            .post(format!("{}/upload", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MediaError::Rejected(format!(
                "upload returned {}",
                response.status()
            )));
        }

        let asset: UploadedAsset = response.json().await?;
        if asset.url.is_empty() || asset.public_id.is_empty() {
            return Err(MediaError::BadUpload(
                "store returned an empty asset reference".into(),
            ));
        }
        tracing::debug!(public_id = %asset.public_id, folder, "uploaded media asset");
        Ok(asset)
    }

    /// Delete a previously uploaded asset by its public id.
    ///
    /// Callers replacing an asset treat failures here as cleanup noise, not
    /// as a failure of their primary operation.
    pub async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let response = self
            .client
            .post(format!("{}/destroy", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({ "public_id": public_id }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MediaError::Rejected(format!(
                "destroy returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
