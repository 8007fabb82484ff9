//! # ecs-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the core
//! ports. Handlers stay thin: resolve the session, shape the input, call the
//! repository, shape the view. All policy lives behind the traits.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use ecs_core::drafts::{
    ArticleDraft, CommentDraft, Completion, NewUser, PostDraft, ProfileUpdate, RequestDraft,
};
use ecs_core::models::{
    Article, Comment, ExchangeKind, ParentKind, Post, PostKind, PostStatus, Request,
    RequestStatus, User,
};
use ecs_core::query::{
    self, ArticleFilter, ExchangeFilter, ExchangeRole, MonthBucket, PostFilter, RequestFilter,
};
use ecs_core::traits::{Authenticator, ShareRepo};

use crate::error::{ApiError, ApiResult};

/// State shared across all workers.
pub struct AppState {
    pub repo: Arc<dyn ShareRepo>,
    pub auth: Arc<dyn Authenticator>,
}

/// Every feature route requires an active session.
async fn require_session(state: &AppState) -> ApiResult<User> {
    state.auth.current().await.ok_or(ApiError::NoSession)
}

/// User-supplied free text is escaped once, at the boundary.
fn sanitize(raw: &str) -> String {
    html_escape::encode_safe(raw).into_owned()
}

// ---------------------------------------------------------------------------
// View shapes

#[derive(Serialize)]
struct CommentView {
    #[serde(flatten)]
    comment: Comment,
    author_name: String,
    author_avatar: Option<String>,
}

fn comment_views(users: &[User], comments: Vec<Comment>) -> Vec<CommentView> {
    comments
        .into_iter()
        .map(|comment| CommentView {
            author_name: query::display_name(users, &comment.user_id),
            author_avatar: query::avatar(users, &comment.user_id),
            comment,
        })
        .collect()
}

#[derive(Serialize)]
struct PostDetail {
    #[serde(flatten)]
    post: Post,
    author_name: String,
    author_avatar: Option<String>,
    comments: Vec<CommentView>,
}

#[derive(Serialize)]
struct RequestDetail {
    #[serde(flatten)]
    request: Request,
    author_name: String,
    author_avatar: Option<String>,
    comments: Vec<CommentView>,
}

#[derive(Serialize)]
struct ArticleCard {
    id: String,
    title: String,
    category: Option<String>,
    tags: Vec<String>,
    image: Option<String>,
    author_name: String,
    excerpt: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl ArticleCard {
    fn from(article: Article, users: &[User], excerpt_len: usize) -> Self {
        Self {
            excerpt: query::excerpt(&article.content, excerpt_len),
            author_name: query::display_name(users, &article.user_id),
            id: article.id,
            title: article.title,
            category: article.category,
            tags: article.tags,
            image: article.image,
            created_at: article.created_at,
        }
    }
}

#[derive(Serialize)]
struct ArticleDetail {
    #[serde(flatten)]
    article: Article,
    author_name: String,
    author_avatar: Option<String>,
    paragraphs: Vec<String>,
    related: Vec<ArticleCard>,
}

/// The profile page: the session user plus everything they own. Article
/// excerpts run longer here than on the shared listing cards.
#[derive(Serialize)]
struct ProfileView {
    user: User,
    posts: Vec<Post>,
    requests: Vec<Request>,
    articles: Vec<ArticleCard>,
}

#[derive(Serialize)]
struct HistoryView {
    shared: usize,
    received: usize,
    total: usize,
    months: Vec<MonthBucket>,
}

#[derive(Serialize)]
struct DashboardView {
    my_posts: usize,
    my_requests: usize,
    my_articles: usize,
    my_exchanges: usize,
    recent_active_posts: Vec<Post>,
    recent_active_requests: Vec<Request>,
}

// ---------------------------------------------------------------------------
// Auth

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    if state.auth.login(&body.email, &body.password).await? {
        let user = state.auth.current().await;
        Ok(HttpResponse::Ok().json(json!({ "success": true, "user": user })))
    } else {
        Ok(HttpResponse::Unauthorized().json(json!({ "success": false })))
    }
}

pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<NewUser>,
) -> ApiResult<HttpResponse> {
    if state.auth.register(body.into_inner()).await? {
        let user = state.auth.current().await;
        Ok(HttpResponse::Created().json(json!({ "success": true, "user": user })))
    } else {
        Ok(HttpResponse::Conflict().json(json!({
            "success": false,
            "error": "email is already registered",
        })))
    }
}

pub async fn logout(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    state.auth.logout().await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn me(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    Ok(HttpResponse::Ok().json(user))
}

// ---------------------------------------------------------------------------
// Posts

#[derive(Deserialize)]
pub struct PostsQuery {
    q: Option<String>,
    kind: Option<PostKind>,
    status: Option<PostStatus>,
    /// Restrict to the session user's own posts.
    #[serde(default)]
    mine: bool,
}

pub async fn list_posts(
    state: web::Data<AppState>,
    params: web::Query<PostsQuery>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let params = params.into_inner();
    let filter = PostFilter {
        search: params.q,
        kind: params.kind,
        status: params.status,
        owner: params.mine.then(|| user.id),
    };
    Ok(HttpResponse::Ok().json(state.repo.list_posts(filter).await?))
}

pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<PostDraft>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let mut draft = body.into_inner();
    draft.description = sanitize(&draft.description);
    let post = state.repo.create_post(&user.id, draft).await?;
    Ok(HttpResponse::Created().json(post))
}

pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_session(&state).await?;
    let id = path.into_inner();
    let post = state
        .repo
        .get_post(&id)
        .await?
        .ok_or_else(|| ecs_core::AppError::NotFound("post", id.clone()))?;

    let users = state.repo.list_users().await?;
    let comments = state.repo.comments_for(ParentKind::Post, &id).await?;
    Ok(HttpResponse::Ok().json(PostDetail {
        author_name: query::display_name(&users, &post.user_id),
        author_avatar: query::avatar(&users, &post.user_id),
        comments: comment_views(&users, comments),
        post,
    }))
}

pub async fn edit_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostDraft>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let mut draft = body.into_inner();
    draft.description = sanitize(&draft.description);
    let post = state.repo.edit_post(path.as_str(), &user.id, draft).await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn comment_on_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CommentDraft>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let draft = CommentDraft {
        content: sanitize(&body.content),
    };
    let comment = state
        .repo
        .add_comment(ParentKind::Post, path.as_str(), &user.id, draft)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn complete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Completion>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let exchange = state
        .repo
        .complete_post(path.as_str(), &user.id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(exchange))
}

// ---------------------------------------------------------------------------
// Requests

#[derive(Deserialize)]
pub struct RequestsQuery {
    q: Option<String>,
    status: Option<RequestStatus>,
    #[serde(default)]
    mine: bool,
}

pub async fn list_requests(
    state: web::Data<AppState>,
    params: web::Query<RequestsQuery>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let params = params.into_inner();
    let filter = RequestFilter {
        search: params.q,
        status: params.status,
        owner: params.mine.then(|| user.id),
    };
    Ok(HttpResponse::Ok().json(state.repo.list_requests(filter).await?))
}

pub async fn create_request(
    state: web::Data<AppState>,
    body: web::Json<RequestDraft>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let mut draft = body.into_inner();
    draft.reason = sanitize(&draft.reason);
    let request = state.repo.create_request(&user.id, draft).await?;
    Ok(HttpResponse::Created().json(request))
}

pub async fn get_request(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_session(&state).await?;
    let id = path.into_inner();
    let request = state
        .repo
        .get_request(&id)
        .await?
        .ok_or_else(|| ecs_core::AppError::NotFound("request", id.clone()))?;

    let users = state.repo.list_users().await?;
    let comments = state.repo.comments_for(ParentKind::Request, &id).await?;
    Ok(HttpResponse::Ok().json(RequestDetail {
        author_name: query::display_name(&users, &request.user_id),
        author_avatar: query::avatar(&users, &request.user_id),
        comments: comment_views(&users, comments),
        request,
    }))
}

pub async fn edit_request(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<RequestDraft>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let mut draft = body.into_inner();
    draft.reason = sanitize(&draft.reason);
    let request = state.repo.edit_request(path.as_str(), &user.id, draft).await?;
    Ok(HttpResponse::Ok().json(request))
}

pub async fn comment_on_request(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CommentDraft>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let draft = CommentDraft {
        content: sanitize(&body.content),
    };
    let comment = state
        .repo
        .add_comment(ParentKind::Request, path.as_str(), &user.id, draft)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn fulfill_request(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Completion>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let exchange = state
        .repo
        .fulfill_request(path.as_str(), &user.id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(exchange))
}

// ---------------------------------------------------------------------------
// Articles

#[derive(Deserialize)]
pub struct ArticlesQuery {
    q: Option<String>,
    category: Option<String>,
    #[serde(default)]
    mine: bool,
}

pub async fn list_articles(
    state: web::Data<AppState>,
    params: web::Query<ArticlesQuery>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let params = params.into_inner();
    let filter = ArticleFilter {
        search: params.q,
        category: params.category,
        owner: params.mine.then(|| user.id),
    };
    let users = state.repo.list_users().await?;
    let cards: Vec<ArticleCard> = state
        .repo
        .list_articles(filter)
        .await?
        .into_iter()
        .map(|a| ArticleCard::from(a, &users, query::EXCERPT_CARD))
        .collect();
    Ok(HttpResponse::Ok().json(cards))
}

pub async fn create_article(
    state: web::Data<AppState>,
    body: web::Json<ArticleDraft>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let article = state.repo.create_article(&user.id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(article))
}

pub async fn get_article(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_session(&state).await?;
    let id = path.into_inner();
    let article = state
        .repo
        .get_article(&id)
        .await?
        .ok_or_else(|| ecs_core::AppError::NotFound("article", id.clone()))?;

    let users = state.repo.list_users().await?;
    let all = state.repo.list_articles(ArticleFilter::default()).await?;
    let related = query::related_articles(&all, &article, 3)
        .into_iter()
        .map(|a| ArticleCard::from(a, &users, query::EXCERPT_TILE))
        .collect();

    Ok(HttpResponse::Ok().json(ArticleDetail {
        author_name: query::display_name(&users, &article.user_id),
        author_avatar: query::avatar(&users, &article.user_id),
        paragraphs: query::paragraphs(&article.content)
            .into_iter()
            .map(str::to_string)
            .collect(),
        related,
        article,
    }))
}

pub async fn edit_article(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ArticleDraft>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let article = state
        .repo
        .edit_article(path.as_str(), &user.id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(article))
}

// ---------------------------------------------------------------------------
// History & dashboard

#[derive(Deserialize)]
pub struct HistoryQuery {
    kind: Option<ExchangeKind>,
    role: Option<ExchangeRole>,
}

pub async fn history(
    state: web::Data<AppState>,
    params: web::Query<HistoryQuery>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let filter = ExchangeFilter {
        kind: params.kind,
        role: params.role,
        ..ExchangeFilter::involving(user.id.clone())
    };
    let exchanges = state.repo.list_exchanges(filter).await?;

    let shared = exchanges.iter().filter(|e| e.giver_id == user.id).count();
    let received = exchanges.iter().filter(|e| e.partner_id == user.id).count();
    Ok(HttpResponse::Ok().json(HistoryView {
        shared,
        received,
        total: exchanges.len(),
        months: query::group_by_month(&exchanges),
    }))
}

pub async fn dashboard(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;

    let my_posts = state
        .repo
        .list_posts(PostFilter {
            owner: Some(user.id.clone()),
            ..PostFilter::default()
        })
        .await?;
    let my_requests = state
        .repo
        .list_requests(RequestFilter {
            owner: Some(user.id.clone()),
            ..RequestFilter::default()
        })
        .await?;
    let my_articles = state
        .repo
        .list_articles(ArticleFilter {
            owner: Some(user.id.clone()),
            ..ArticleFilter::default()
        })
        .await?;
    let my_exchanges = state
        .repo
        .list_exchanges(ExchangeFilter::involving(user.id.clone()))
        .await?;

    let mut active_posts = state
        .repo
        .list_posts(PostFilter {
            status: Some(PostStatus::Available),
            ..PostFilter::default()
        })
        .await?;
    active_posts.truncate(3);
    let mut active_requests = state
        .repo
        .list_requests(RequestFilter {
            status: Some(RequestStatus::Open),
            ..RequestFilter::default()
        })
        .await?;
    active_requests.truncate(3);

    Ok(HttpResponse::Ok().json(DashboardView {
        my_posts: my_posts.len(),
        my_requests: my_requests.len(),
        my_articles: my_articles.len(),
        my_exchanges: my_exchanges.len(),
        recent_active_posts: active_posts,
        recent_active_requests: active_requests,
    }))
}

// ---------------------------------------------------------------------------
// Profile

pub async fn get_profile(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;

    let posts = state
        .repo
        .list_posts(PostFilter {
            owner: Some(user.id.clone()),
            ..PostFilter::default()
        })
        .await?;
    let requests = state
        .repo
        .list_requests(RequestFilter {
            owner: Some(user.id.clone()),
            ..RequestFilter::default()
        })
        .await?;
    let users = state.repo.list_users().await?;
    let articles = state
        .repo
        .list_articles(ArticleFilter {
            owner: Some(user.id.clone()),
            ..ArticleFilter::default()
        })
        .await?
        .into_iter()
        .map(|a| ArticleCard::from(a, &users, query::EXCERPT_PROFILE))
        .collect();

    Ok(HttpResponse::Ok().json(ProfileView {
        user,
        posts,
        requests,
        articles,
    }))
}

pub async fn update_profile(
    state: web::Data<AppState>,
    body: web::Json<ProfileUpdate>,
) -> ApiResult<HttpResponse> {
    let user = require_session(&state).await?;
    let updated = state.repo.update_profile(&user.id, body.into_inner()).await?;
    // Keep the session and its durable copy in step with the collection.
    state.auth.refresh(updated.clone()).await?;
    Ok(HttpResponse::Ok().json(updated))
}
