//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/posts`. The author is never taken from the body; it is
/// stamped from the validated identity.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    /// Empty, or a path like `/thumbnails/...`.
    #[serde(default)]
    pub thumbnail: String,
}

/// Response of `POST /api/thumbnails`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailUploadResponse {
    pub path: String,
}
