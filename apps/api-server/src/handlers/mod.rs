//! HTTP handlers and route configuration.

mod health;
mod posts;
mod thumbnails;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/posts", web::get().to(posts::list_posts))
            .route("/posts/{id}", web::get().to(posts::get_post))
            .route("/thumbnails", web::get().to(thumbnails::list_thumbnails))
            // Mutations require a validated, allowlisted user
            .route("/posts", web::post().to(posts::create_post))
            .route("/posts/{id}", web::patch().to(posts::patch_post))
            .route("/posts/{id}", web::delete().to(posts::delete_post))
            .route("/thumbnails", web::post().to(thumbnails::upload_thumbnail)),
    );
}
