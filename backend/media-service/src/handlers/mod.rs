/// HTTP handlers for the catalog service
use actix_web::{web, HttpRequest};

use crate::error::{AppError, Result};

pub mod health;
pub mod videos;

pub use health::health;
pub use videos::list_videos;

/// Register every route of the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health))
            .route("/videos", web::get().to(list_videos)),
    )
    .default_service(web::to(not_found));
}

async fn not_found(req: HttpRequest) -> Result<actix_web::HttpResponse> {
    Err(AppError::NotFound(req.path().to_string()))
}
