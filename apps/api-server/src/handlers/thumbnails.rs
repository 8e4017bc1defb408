//! Thumbnail upload and listing.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;

use warpdrive_shared::dto::ThumbnailUploadResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/thumbnails
pub async fn list_thumbnails(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let paths = state.thumbs.list()?;
    Ok(HttpResponse::Ok().json(paths))
}

/// POST /api/thumbnails
///
/// Accepts `multipart/form-data` with a single `file` field. Size limits are
/// left to the reverse proxy, matching the rest of the deployment.
pub async fn upload_thumbnail(
    state: web::Data<AppState>,
    _identity: Identity,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(e.to_string()))?;
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("missing filename".to_string()))?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
            bytes.extend_from_slice(&chunk);
        }

        let path = state.thumbs.save(&filename, &bytes)?;
        return Ok(HttpResponse::Created().json(ThumbnailUploadResponse { path }));
    }

    Err(AppError::BadRequest("missing file".to_string()))
}
