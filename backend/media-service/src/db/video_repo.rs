/// Video repository - database operations for videos
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{NewVideo, VideoRow};

/// Read access to the video catalog
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// All videos, newest first. Equal timestamps keep the later insert first.
    async fn list_videos(&self) -> Result<Vec<VideoRow>>;
}

pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn list_videos(&self) -> Result<Vec<VideoRow>> {
        // Returned to the pool when dropped, on every path out of this call
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::CatalogUnavailable(e.to_string()))?;

        let videos = sqlx::query_as::<_, VideoRow>(
            "SELECT id, seq, title, description, public_id, original_size, \
             compressed_size, duration, created_at, updated_at \
             FROM videos \
             ORDER BY created_at DESC, seq DESC",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::CatalogUnavailable(e.to_string()))?;

        Ok(videos)
    }
}

/// Process-local catalog
#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: RwLock<Vec<VideoRow>>,
    unavailable: RwLock<Option<String>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, video: NewVideo, created_at: DateTime<Utc>) -> Result<VideoRow> {
        let mut videos = self.write_videos()?;
        let row = VideoRow {
            id: Uuid::new_v4(),
            seq: videos.len() as i64 + 1,
            title: video.title,
            description: video.description,
            public_id: video.public_id,
            original_size: video.original_size,
            compressed_size: video.compressed_size,
            duration: video.duration,
            created_at,
            updated_at: created_at,
        };
        videos.push(row.clone());
        Ok(row)
    }

    /// Make every subsequent read fail with `reason`, or recover with `None`
    pub fn set_unavailable(&self, reason: Option<String>) {
        if let Ok(mut unavailable) = self.unavailable.write() {
            *unavailable = reason;
        }
    }

    fn write_videos(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<VideoRow>>> {
        self.videos
            .write()
            .map_err(|_| AppError::CatalogUnavailable("video store lock poisoned".into()))
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn list_videos(&self) -> Result<Vec<VideoRow>> {
        if let Ok(unavailable) = self.unavailable.read() {
            if let Some(reason) = unavailable.as_ref() {
                return Err(AppError::CatalogUnavailable(reason.clone()));
            }
        }

        let mut videos = self
            .videos
            .read()
            .map_err(|_| AppError::CatalogUnavailable("video store lock poisoned".into()))?
            .clone();
        videos.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });
        Ok(videos)
    }
}
