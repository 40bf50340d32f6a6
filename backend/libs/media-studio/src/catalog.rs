//! Video catalog query
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::constants::VIDEO_LIST_PATH;
use crate::error::{Result, StudioError};
use crate::models::VideoRecord;

/// Read-only client for the video listing endpoint.
///
/// Every call re-queries the catalog. Records are returned in the order the
/// catalog sent them (newest first).
#[derive(Clone)]
pub struct CatalogClient {
    http_client: Client,
    api_base: Url,
}

impl CatalogClient {
    pub fn new(http_client: Client, api_base: Url) -> Self {
        Self {
            http_client,
            api_base,
        }
    }

    pub async fn list_videos(&self) -> Result<Vec<VideoRecord>> {
        let endpoint = self.api_base.join(VIDEO_LIST_PATH).map_err(|e| {
            warn!("Invalid catalog endpoint: {e}");
            StudioError::CatalogUnavailable
        })?;

        let response = self.http_client.get(endpoint).send().await.map_err(|e| {
            warn!("Catalog request failed: {e}");
            StudioError::CatalogUnavailable
        })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Catalog returned an error status");
            return Err(StudioError::CatalogUnavailable);
        }

        let videos: Vec<VideoRecord> = response.json().await.map_err(|e| {
            warn!("Malformed catalog response: {e}");
            StudioError::CatalogUnavailable
        })?;

        debug!(count = videos.len(), "Listed videos");
        Ok(videos)
    }
}
