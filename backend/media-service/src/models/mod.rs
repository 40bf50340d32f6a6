/// Data models for media-service
///
/// Database rows and their conversion into the catalog's wire shape.
use chrono::{DateTime, Utc};
use media_studio::VideoRecord;
use uuid::Uuid;

/// A row of the `videos` table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    /// Insertion order, breaks ties between equal `created_at`
    pub seq: i64,
    pub title: String,
    pub description: Option<String>,
    pub public_id: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub duration: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VideoRow> for VideoRecord {
    fn from(row: VideoRow) -> Self {
        VideoRecord {
            id: row.id.to_string(),
            title: row.title,
            description: row.description,
            public_id: row.public_id,
            original_size: row.original_size,
            compressed_size: row.compressed_size,
            duration: row.duration,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Fields supplied when recording a new video
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub public_id: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub duration: Option<f64>,
}
