/// Video handlers - HTTP endpoints for the video catalog
use actix_web::{web, HttpResponse};
use media_studio::VideoRecord;
use tracing::debug;

use crate::db::VideoRepository;
use crate::error::Result;

/// List all videos, newest first
pub async fn list_videos(repo: web::Data<dyn VideoRepository>) -> Result<HttpResponse> {
    let videos: Vec<VideoRecord> = repo
        .list_videos()
        .await?
        .into_iter()
        .map(VideoRecord::from)
        .collect();

    debug!(count = videos.len(), "Listed videos");
    Ok(HttpResponse::Ok().json(videos))
}
