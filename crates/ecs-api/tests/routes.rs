//! End-to-end route tests over the seeded in-memory stack.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use ecs_api::handlers::AppState;
use ecs_api::{configure_routes, middleware};
use ecs_auth_mock::MockAuthenticator;
use ecs_core::models::User;
use ecs_core::traits::{Authenticator, SessionCache};
use ecs_store_memory::MemoryStore;

/// Single-slot cache stub; the file plugin is exercised in its own crate.
#[derive(Default)]
struct SlotCache {
    slot: Mutex<Option<User>>,
}

#[async_trait]
impl SessionCache for SlotCache {
    async fn load(&self) -> anyhow::Result<Option<User>> {
        Ok(self.slot.lock().unwrap().clone())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        *self.slot.lock().unwrap() = Some(user.clone());
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

fn state() -> web::Data<AppState> {
    let repo = Arc::new(MemoryStore::seeded());
    let auth = Arc::new(MockAuthenticator::with_latency(
        repo.clone(),
        Arc::new(SlotCache::default()),
        Duration::ZERO,
        Duration::ZERO,
    ));
    web::Data::new(AppState { repo, auth })
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .wrap(middleware::standard_middleware())
                .configure(configure_routes),
        )
        .await
    };
}

async fn login_as(state: &web::Data<AppState>, email: &str) {
    assert!(state.auth.login(email, "apapun").await.unwrap());
}

#[actix_web::test]
async fn feature_routes_require_a_session() {
    let state = state();
    let app = app!(state);

    for path in ["/posts", "/requests", "/articles", "/history", "/dashboard", "/profile"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        assert_eq!(resp.status(), 401, "unauthenticated GET {path}");
    }
}

#[actix_web::test]
async fn login_rejects_unknown_email_and_accepts_any_password() {
    let state = state();
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "tidak@ada.com", "password": "x" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "rizky@example.com", "password": "apapun" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], "1");
}

#[actix_web::test]
async fn post_lifecycle_create_detail_complete() {
    let state = state();
    login_as(&state, "rizky@example.com").await;
    let app = app!(state);

    // Create
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({
                "title": "Bibit A",
                "kind": "seed",
                "quantity": 5,
                "location": "Bandung",
                "description": "desc",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["status"], "available");
    let id = created["id"].as_str().unwrap().to_string();

    // Detail carries author and (empty) comments.
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri(&format!("/posts/{id}")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let detail: Value = test::read_body_json(resp).await;
    assert_eq!(detail["author_name"], "Rizky Yusmansyah");
    assert_eq!(detail["comments"].as_array().unwrap().len(), 0);

    // Complete writes the exchange.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{id}/complete"))
            .set_json(json!({ "partner_id": "2", "notes": "sudah diambil" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let exchange: Value = test::read_body_json(resp).await;
    assert_eq!(exchange["kind"], "post");
    assert_eq!(exchange["giver_id"], "1");
    assert_eq!(exchange["partner_id"], "2");

    // Completing again conflicts.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{id}/complete"))
            .set_json(json!({ "partner_id": "3" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 409);
}

#[actix_web::test]
async fn editing_someone_elses_post_is_forbidden() {
    let state = state();
    login_as(&state, "fadli@example.com").await;
    let app = app!(state);

    // Post 1 belongs to user 1; Fadli is user 2.
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/posts/1")
            .set_json(json!({
                "title": "Dibajak",
                "kind": "seed",
                "quantity": 1,
                "location": "X",
                "description": "Y",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);
}

#[actix_web::test]
async fn validation_failures_return_the_field_map() {
    let state = state();
    login_as(&state, "rizky@example.com").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({
                "title": "",
                "kind": "seed",
                "quantity": 0,
                "location": "Bandung",
                "description": "desc",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["title"].is_string());
    assert!(body["fields"]["quantity"].is_string());
}

#[actix_web::test]
async fn comment_content_is_escaped_at_the_boundary() {
    let state = state();
    login_as(&state, "fadli@example.com").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/1/comments")
            .set_json(json!({ "content": "<script>alert(1)</script> halo" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let comment: Value = test::read_body_json(resp).await;
    let content = comment["content"].as_str().unwrap();
    assert!(!content.contains('<'));
    assert!(content.contains("halo"));
}

#[actix_web::test]
async fn missing_detail_ids_map_to_404() {
    let state = state();
    login_as(&state, "rizky@example.com").await;
    let app = app!(state);

    for path in ["/posts/999", "/requests/999", "/articles/999"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        assert_eq!(resp.status(), 404, "GET {path}");
    }
}

#[actix_web::test]
async fn history_is_scoped_grouped_and_counted() {
    let state = state();
    // Rizky (user 1) received both seed exchanges.
    login_as(&state, "rizky@example.com").await;
    let app = app!(state);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/history").to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["shared"], 0);
    assert_eq!(body["received"], 2);

    let months = body["months"].as_array().unwrap();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0]["label"], "Juli 2023");
    assert_eq!(months[1]["label"], "Juni 2023");

    // Role filter narrows to nothing for the giver side.
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/history?role=giver").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 0);
}

#[actix_web::test]
async fn article_detail_includes_related_and_paragraphs() {
    let state = state();
    login_as(&state, "andi@example.com").await;
    let app = app!(state);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/articles/1").to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;

    let related = body["related"].as_array().unwrap();
    assert_eq!(related.len(), 3);
    assert!(related.iter().all(|a| a["id"] != "1"));
    assert!(body["paragraphs"].as_array().unwrap().len() > 1);
    assert_eq!(body["author_name"], "Fadli Ahmad");
}

#[actix_web::test]
async fn profile_view_lists_own_content_with_longer_excerpts() {
    let state = state();
    login_as(&state, "rizky@example.com").await;
    let app = app!(state);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/profile").to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["user"]["id"], "1");
    assert!(body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["user_id"] == "1"));
    assert!(body["requests"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["user_id"] == "1"));
    assert_eq!(body["articles"].as_array().unwrap().len(), 2);

    // Profile cards carry a longer excerpt than listing cards (180 vs 150).
    let excerpt = body["articles"][0]["excerpt"].as_str().unwrap();
    assert!(excerpt.ends_with("..."));
    let len = excerpt.chars().count();
    assert!(len > 150 && len <= 183, "unexpected excerpt length {len}");
}

#[actix_web::test]
async fn profile_update_refreshes_the_session() {
    let state = state();
    login_as(&state, "rizky@example.com").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/profile")
            .set_json(json!({
                "name": "Rizky Y.",
                "email": "rizky@example.com",
                "location": "Medan",
                "favorite_plants": ["Tomat", "Selada"],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/auth/me").to_request()).await;
    let me: Value = test::read_body_json(resp).await;
    assert_eq!(me["location"], "Medan");
    assert_eq!(me["name"], "Rizky Y.");
}

#[actix_web::test]
async fn dashboard_counts_and_recent_slices() {
    let state = state();
    login_as(&state, "rizky@example.com").await;
    let app = app!(state);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;

    // Seed data: user 1 owns posts 1 and 4, request 2, articles 2 and 5,
    // and is the partner on both exchanges.
    assert_eq!(body["my_posts"], 2);
    assert_eq!(body["my_requests"], 1);
    assert_eq!(body["my_articles"], 2);
    assert_eq!(body["my_exchanges"], 2);
    assert!(body["recent_active_posts"].as_array().unwrap().len() <= 3);
    assert!(body["recent_active_requests"].as_array().unwrap().len() <= 3);
}

#[actix_web::test]
async fn register_then_me_round_trip() {
    let state = state();
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "name": "Test",
                "email": "t@example.com",
                "password": "secret1",
                "location": "Jakarta",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/auth/me").to_request()).await;
    assert_eq!(resp.status(), 200);
    let me: Value = test::read_body_json(resp).await;
    assert_eq!(me["email"], "t@example.com");

    // Same email again conflicts.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "name": "Peniru",
                "email": "t@example.com",
                "password": "lain",
                "location": "Bogor",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 409);
}

#[actix_web::test]
async fn posts_listing_honors_filters() {
    let state = state();
    login_as(&state, "rizky@example.com").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/posts?status=available&kind=seed")
            .to_request(),
    )
    .await;
    let posts: Value = test::read_body_json(resp).await;
    let posts = posts.as_array().unwrap();
    assert!(posts
        .iter()
        .all(|p| p["status"] == "available" && p["kind"] == "seed"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/posts?mine=true").to_request(),
    )
    .await;
    let mine: Value = test::read_body_json(resp).await;
    assert!(mine.as_array().unwrap().iter().all(|p| p["user_id"] == "1"));
}
