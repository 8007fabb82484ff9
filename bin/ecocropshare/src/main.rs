//! # EcoCropShare Binary
//!
//! The entry point that assembles the application based on compile-time features.

use actix_web::{web, App, HttpServer};
use ecs_api::handlers::AppState;
use ecs_api::{configure_routes, middleware};
use ecs_core::Authenticator;
use std::sync::Arc;

// Feature-gated imports: each backend is compiled to order
#[cfg(feature = "store-memory")]
use ecs_store_memory::MemoryStore;

#[cfg(feature = "auth-mock")]
use ecs_auth_mock::MockAuthenticator;

#[cfg(feature = "session-file")]
use ecs_session_file::FileSessionCache;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // 1. Initialize the repository implementation
    #[cfg(feature = "store-memory")]
    let repo: Arc<dyn ecs_core::ShareRepo> = {
        let seeded = env_or("ECS_SEED_FIXTURES", "true") != "false";
        if seeded {
            Arc::new(MemoryStore::seeded())
        } else {
            Arc::new(MemoryStore::new())
        }
    };

    // 2. Initialize the session cache implementation
    #[cfg(feature = "session-file")]
    let cache: Arc<dyn ecs_core::SessionCache> = Arc::new(FileSessionCache::new(env_or(
        "ECS_SESSION_FILE",
        "./data/session.json",
    )));

    // 3. Initialize the authenticator implementation
    #[cfg(feature = "auth-mock")]
    let auth = MockAuthenticator::new(repo.clone(), cache);

    // Pick a cached session back up across restarts
    if let Err(err) = auth.restore().await {
        log::warn!("could not restore cached session: {err}");
    }

    // 4. Wrap in AppState (dynamic dispatch so handlers stay backend-agnostic)
    let state = web::Data::new(AppState {
        repo,
        auth: Arc::new(auth),
    });

    let bind = env_or("ECS_BIND", "127.0.0.1:8080");
    log::info!("🌱 EcoCropShare starting on http://{bind}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::standard_middleware())
            .wrap(middleware::cors_policy())
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
