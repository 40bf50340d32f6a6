//! Core media data models

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Kind of asset being uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Video => "video",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque identifier handed out by the storage service after an upload.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Returns `None` for an empty or blank identifier
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk, keeping its file name
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, data))
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Everything needed to upload one file.
///
/// Title and description are only sent on the video path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub kind: AssetKind,
    pub file: MediaFile,
    pub title: String,
    pub description: String,
}

impl UploadRequest {
    pub fn image(file: MediaFile) -> Self {
        Self {
            kind: AssetKind::Image,
            file,
            title: String::new(),
            description: String::new(),
        }
    }

    pub fn video(
        file: MediaFile,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: AssetKind::Video,
            file,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Whether a late result was applied or dropped because a newer request superseded it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Resolution {
    Applied,
    StaleIgnored,
}

impl Resolution {
    pub fn is_applied(&self) -> bool {
        matches!(self, Resolution::Applied)
    }
}

/// Video metadata as served by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub public_id: String,
    pub original_size: i64,
    pub compressed_size: i64,
    #[serde(default)]
    pub duration: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_rejects_blank() {
        assert!(AssetId::new("").is_none());
        assert!(AssetId::new("   ").is_none());
        assert_eq!(AssetId::new("img123").unwrap().as_str(), "img123");
    }

    #[test]
    fn test_media_file_size() {
        let file = MediaFile::new("a.png", vec![0u8; 2048]);
        assert_eq!(file.size_bytes(), 2048);
        assert!(file.content_type.is_none());
    }

    #[test]
    fn test_video_record_json_shape() {
        let json = r#"{
            "id": "v1",
            "title": "Launch",
            "description": null,
            "publicId": "videos/launch",
            "originalSize": 1000,
            "compressedSize": 400,
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }"#;
        let record: VideoRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.public_id, "videos/launch");
        assert_eq!(record.duration, None);

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("originalSize").is_some());
        assert!(value.get("original_size").is_none());
    }
}
