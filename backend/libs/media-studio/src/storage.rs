//! Asset storage and transform service client
//!
//! Provides the two capabilities the studio consumes:
//! - upload a file and get back its asset id
//! - fetch the bytes behind a render URL
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::constants::{IMAGE_UPLOAD_PATH, VIDEO_UPLOAD_PATH};
use crate::error::{ExportError, Result, StudioError, UploadError};
use crate::models::{AssetId, AssetKind, UploadRequest};

/// Upload capability of the storage service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// One network call, no retry
    async fn upload(&self, request: &UploadRequest) -> std::result::Result<AssetId, UploadError>;
}

/// Retrieves the full byte content behind a URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RenderFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<Bytes, ExportError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponseBody {
    #[serde(rename = "publicId", alias = "public_id")]
    public_id: String,
}

/// HTTP client for the storage service
#[derive(Clone)]
pub struct HttpAssetStore {
    http_client: Client,
    api_base: Url,
}

impl HttpAssetStore {
    /// `api_base` must end with a slash so endpoint paths join under it
    pub fn new(http_client: Client, api_base: Url) -> Self {
        Self {
            http_client,
            api_base,
        }
    }

    fn endpoint(&self, kind: AssetKind) -> Result<Url> {
        let path = match kind {
            AssetKind::Image => IMAGE_UPLOAD_PATH,
            AssetKind::Video => VIDEO_UPLOAD_PATH,
        };
        self.api_base
            .join(path)
            .map_err(|e| StudioError::Config(format!("invalid upload endpoint: {e}")))
    }

    fn form(request: &UploadRequest) -> std::result::Result<Form, UploadError> {
        let mut part =
            Part::bytes(request.file.data.to_vec()).file_name(request.file.name.clone());
        if let Some(ref content_type) = request.file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| UploadError::Upload(format!("invalid content type: {e}")))?;
        }

        let form = Form::new().part("file", part);
        let form = match request.kind {
            AssetKind::Image => form,
            AssetKind::Video => form
                .text("title", request.title.clone())
                .text("description", request.description.clone())
                .text("originalSize", request.file.size_bytes().to_string()),
        };
        Ok(form)
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn upload(&self, request: &UploadRequest) -> std::result::Result<AssetId, UploadError> {
        let endpoint = self
            .endpoint(request.kind)
            .map_err(|e| UploadError::Upload(e.to_string()))?;
        let form = Self::form(request)?;

        debug!(
            kind = %request.kind,
            file_name = %request.file.name,
            size = request.file.size_bytes(),
            "Uploading asset"
        );

        let response = self
            .http_client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(kind = %request.kind, "Upload transport error: {e}");
                UploadError::Upload(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(kind = %request.kind, %status, "Upload rejected by storage service");
            return Err(UploadError::Upload(format!(
                "upload failed with status {}: {}",
                status, body
            )));
        }

        let body: UploadResponseBody = response
            .json()
            .await
            .map_err(|e| UploadError::Upload(format!("malformed upload response: {e}")))?;

        let asset_id = AssetId::new(body.public_id)
            .ok_or_else(|| UploadError::Upload("upload response has an empty publicId".into()))?;

        info!(kind = %request.kind, asset_id = %asset_id, "Asset uploaded");
        Ok(asset_id)
    }
}

#[async_trait]
impl RenderFetcher for HttpAssetStore {
    async fn fetch(&self, url: &str) -> std::result::Result<Bytes, ExportError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ExportError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ExportError::FetchFailed(format!(
                "render fetch failed with status {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExportError::FetchFailed(format!("failed to read render body: {e}")))?;

        debug!(url = %url, size = bytes.len(), "Fetched render");
        Ok(bytes)
    }
}
