//! # ecs-api
//!
//! The web routing and orchestration layer for EcoCropShare. Everything here
//! speaks JSON; rendering is the single-page UI's job.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;

/// Configures the API routes.
///
/// Scoped configuration lets the binary mount everything under a different
/// prefix (e.g. /api/v1/) without touching the handlers.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            // Session
            .route("/auth/login", web::post().to(handlers::login))
            .route("/auth/register", web::post().to(handlers::register))
            .route("/auth/logout", web::post().to(handlers::logout))
            .route("/auth/me", web::get().to(handlers::me))
            // Posts (seed/harvest offers)
            .route("/posts", web::get().to(handlers::list_posts))
            .route("/posts", web::post().to(handlers::create_post))
            .route("/posts/{id}", web::get().to(handlers::get_post))
            .route("/posts/{id}", web::put().to(handlers::edit_post))
            .route("/posts/{id}/comments", web::post().to(handlers::comment_on_post))
            .route("/posts/{id}/complete", web::post().to(handlers::complete_post))
            // Requests (needs)
            .route("/requests", web::get().to(handlers::list_requests))
            .route("/requests", web::post().to(handlers::create_request))
            .route("/requests/{id}", web::get().to(handlers::get_request))
            .route("/requests/{id}", web::put().to(handlers::edit_request))
            .route(
                "/requests/{id}/comments",
                web::post().to(handlers::comment_on_request),
            )
            .route(
                "/requests/{id}/fulfill",
                web::post().to(handlers::fulfill_request),
            )
            // Articles
            .route("/articles", web::get().to(handlers::list_articles))
            .route("/articles", web::post().to(handlers::create_article))
            .route("/articles/{id}", web::get().to(handlers::get_article))
            .route("/articles/{id}", web::put().to(handlers::edit_article))
            // Ledger, dashboard, profile
            .route("/history", web::get().to(handlers::history))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/profile", web::get().to(handlers::get_profile))
            .route("/profile", web::put().to(handlers::update_profile)),
    );
}
