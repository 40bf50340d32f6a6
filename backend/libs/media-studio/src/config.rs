/// Configuration for the media studio
///
/// Loads configuration from environment variables with sensible defaults.
use reqwest::Client;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_DELIVERY_BASE_URL, DEFAULT_EXPORT_DIR,
    DEFAULT_VIDEO_DELIVERY_BASE_URL,
};
use crate::error::{Result, StudioError};
use crate::size_guard::SizePolicy;

#[derive(Clone, Debug)]
pub struct StudioConfig {
    /// Base of the upload and listing endpoints, always ending with `/`
    pub api_base_url: Url,
    /// Base of image render URLs
    pub delivery_base_url: String,
    /// Base of video render URLs
    pub video_delivery_base_url: String,
    pub size_policy: SizePolicy,
    pub export_dir: PathBuf,
    /// Applied to every HTTP call when set. Unset means wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl StudioConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SizePolicy::default();

        let api_base_url = parse_base_url(
            &lookup("STUDIO_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        )?;

        let video_max_bytes = match lookup("STUDIO_VIDEO_MAX_BYTES") {
            Some(raw) => parse_limit("STUDIO_VIDEO_MAX_BYTES", &raw)?,
            None => defaults.video_max_bytes,
        };
        let image_max_bytes = match lookup("STUDIO_IMAGE_MAX_BYTES") {
            Some(raw) => parse_limit("STUDIO_IMAGE_MAX_BYTES", &raw)?,
            None => defaults.image_max_bytes,
        };

        let request_timeout = lookup("STUDIO_REQUEST_TIMEOUT_SECS")
            .map(|raw| parse_number::<u64>("STUDIO_REQUEST_TIMEOUT_SECS", &raw))
            .transpose()?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            api_base_url,
            delivery_base_url: lookup("STUDIO_DELIVERY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_DELIVERY_BASE_URL.to_string()),
            video_delivery_base_url: lookup("STUDIO_VIDEO_DELIVERY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_VIDEO_DELIVERY_BASE_URL.to_string()),
            size_policy: SizePolicy {
                image_max_bytes,
                video_max_bytes,
            },
            export_dir: lookup("STUDIO_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR)),
            request_timeout,
        })
    }

    /// HTTP client shared by the storage and catalog clients
    pub fn http_client(&self) -> Result<Client> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| StudioError::Config(format!("failed to create HTTP client: {e}")))
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized)
        .map_err(|e| StudioError::Config(format!("STUDIO_API_BASE_URL is invalid: {e}")))
}

/// Empty, `none` or `unlimited` disable the limit
fn parse_limit(key: &str, raw: &str) -> Result<Option<u64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("unlimited")
    {
        return Ok(None);
    }
    parse_number(key, trimmed).map(Some)
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        StudioError::Config(format!("{key} must be a non-negative integer, got {raw:?}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<StudioConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StudioConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.size_policy.video_max_bytes, Some(70 * 1024 * 1024));
        assert_eq!(config.size_policy.image_max_bytes, None);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.export_dir, PathBuf::from("exports"));
        assert!(config.delivery_base_url.ends_with("/image/upload"));
        assert!(config.video_delivery_base_url.ends_with("/video/upload"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STUDIO_API_BASE_URL", "https://studio.example.com/app"),
            ("STUDIO_DELIVERY_BASE_URL", "https://cdn.example.com/upload"),
            ("STUDIO_VIDEO_DELIVERY_BASE_URL", "https://cdn.example.com/video"),
            ("STUDIO_VIDEO_MAX_BYTES", "1024"),
            ("STUDIO_IMAGE_MAX_BYTES", "2048"),
            ("STUDIO_EXPORT_DIR", "/tmp/out"),
            ("STUDIO_REQUEST_TIMEOUT_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.api_base_url.as_str(), "https://studio.example.com/app/");
        assert_eq!(config.delivery_base_url, "https://cdn.example.com/upload");
        assert_eq!(config.video_delivery_base_url, "https://cdn.example.com/video");
        assert_eq!(config.size_policy.video_max_bytes, Some(1024));
        assert_eq!(config.size_policy.image_max_bytes, Some(2048));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_limit_can_be_disabled() {
        let config = load(&[("STUDIO_VIDEO_MAX_BYTES", "none")]).unwrap();
        assert_eq!(config.size_policy.video_max_bytes, None);
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = load(&[("STUDIO_REQUEST_TIMEOUT_SECS", "0")]).unwrap();
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(
            load(&[("STUDIO_VIDEO_MAX_BYTES", "lots")]),
            Err(StudioError::Config(_))
        ));
        assert!(matches!(
            load(&[("STUDIO_API_BASE_URL", "not a url")]),
            Err(StudioError::Config(_))
        ));
        assert!(matches!(
            load(&[("STUDIO_REQUEST_TIMEOUT_SECS", "-1")]),
            Err(StudioError::Config(_))
        ));
    }

    #[test]
    fn test_http_client_builds() {
        let config = load(&[("STUDIO_REQUEST_TIMEOUT_SECS", "5")]).unwrap();
        assert!(config.http_client().is_ok());
    }
}
