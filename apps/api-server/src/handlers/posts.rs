//! Post CRUD handlers.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use warpdrive_core::domain::{NewPost, Post, PostPatch};
use warpdrive_shared::dto::CreatePostRequest;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// `GET /api/posts/{id}` response: the metadata record plus the markdown
/// body.
#[derive(Serialize)]
struct PostWithContent {
    #[serde(flatten)]
    post: Post,
    content: String,
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let (post, content) = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostWithContent { post, content }))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .create(NewPost {
            author: identity.username,
            title: req.title,
            description: req.description,
            content: req.content,
            thumbnail: req.thumbnail,
        })
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// PATCH /api/posts/{id}
pub async fn patch_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<PostPatch>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(path.into_inner(), body.into_inner(), &identity.username)
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state.posts.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
