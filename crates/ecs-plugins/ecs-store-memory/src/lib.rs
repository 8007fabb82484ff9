//! # ecs-store-memory
//!
//! In-memory implementation of `ShareRepo`. Backs the whole application with
//! plain collections behind one `RwLock`, seeded from [`fixtures`] at
//! startup. Every read hands out clones; every failed mutation leaves the
//! collections untouched. Writers publish a [`StoreEvent`] per change so the
//! UI (or tests, or a future sync layer) can react without polling.

pub mod fixtures;

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;

use ecs_core::drafts::{
    ArticleDraft, CommentDraft, Completion, PostDraft, ProfileUpdate, RequestDraft,
};
use ecs_core::error::{AppError, Result};
use ecs_core::models::{
    new_id, Access, Article, Comment, Exchange, ExchangeKind, ParentKind, Post, PostStatus,
    Request, RequestStatus, User,
};
use ecs_core::query::{
    sort_newest_first, ArticleFilter, ExchangeFilter, PostFilter, RequestFilter,
};
use ecs_core::traits::ShareRepo;

use fixtures::SeedData;

/// Which collection a change event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Posts,
    Requests,
    Articles,
    Comments,
    Exchanges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
}

/// Published after every successful write, once the lock is released.
#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub collection: Collection,
    pub kind: ChangeKind,
    pub id: String,
}

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    posts: Vec<Post>,
    requests: Vec<Request>,
    articles: Vec<Article>,
    comments: Vec<Comment>,
    exchanges: Vec<Exchange>,
}

/// The in-memory store. Cheap to construct per test; one shared instance per
/// running process.
pub struct MemoryStore {
    inner: RwLock<Collections>,
    events: broadcast::Sender<StoreEvent>,
}

impl MemoryStore {
    /// An empty store. Useful for tests that build their own state.
    pub fn new() -> Self {
        Self::from_seed(SeedData::default())
    }

    /// A store populated with the demo fixtures.
    pub fn seeded() -> Self {
        Self::from_seed(fixtures::seed())
    }

    pub fn from_seed(data: SeedData) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: RwLock::new(Collections {
                users: data.users,
                posts: data.posts,
                requests: data.requests,
                articles: data.articles,
                comments: data.comments,
                exchanges: data.exchanges,
            }),
            events,
        }
    }

    /// Subscribes to change events. Receivers that fall behind miss events;
    /// consumers needing history should re-query instead.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn publish(&self, collection: Collection, kind: ChangeKind, id: &str) {
        log::debug!("store change: {collection:?} {kind:?} id={id}");
        // No receivers is fine; events are best-effort.
        let _ = self.events.send(StoreEvent {
            collection,
            kind,
            id: id.to_string(),
        });
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Collections> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Collections> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShareRepo for MemoryStore {
    // ── Users ────────────────────────────────────────────────────────────

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        // Exact, case-sensitive match throughout.
        Ok(self.read().users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.read().users.clone())
    }

    async fn create_user(&self, user: User) -> Result<User> {
        let id = user.id.clone();
        {
            let mut inner = self.write();
            if inner.users.iter().any(|u| u.email == user.email) {
                return Err(AppError::Conflict(format!(
                    "email {} is already registered",
                    user.email
                )));
            }
            inner.users.push(user.clone());
        }
        self.publish(Collection::Users, ChangeKind::Created, &id);
        Ok(user)
    }

    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User> {
        update.validate()?;
        let updated = {
            let mut inner = self.write();
            if inner
                .users
                .iter()
                .any(|u| u.id != user_id && u.email == update.email)
            {
                return Err(AppError::field("email", "email is already in use"));
            }
            let user = inner
                .users
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or_else(|| AppError::NotFound("user", user_id.to_string()))?;
            update.apply_to(user);
            user.clone()
        };
        self.publish(Collection::Users, ChangeKind::Updated, user_id);
        Ok(updated)
    }

    // ── Posts ────────────────────────────────────────────────────────────

    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .read()
            .posts
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        sort_newest_first(&mut posts, |p| p.created_at);
        Ok(posts)
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.read().posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create_post(&self, owner_id: &str, draft: PostDraft) -> Result<Post> {
        draft.validate()?;
        let now = Utc::now();
        let post = Post {
            id: new_id(),
            user_id: owner_id.to_string(),
            title: draft.title,
            kind: draft.kind,
            quantity: draft.quantity,
            location: draft.location,
            images: draft.images,
            description: draft.description,
            status: PostStatus::Available,
            created_at: now,
            updated_at: now,
        };
        self.write().posts.push(post.clone());
        self.publish(Collection::Posts, ChangeKind::Created, &post.id);
        Ok(post)
    }

    async fn edit_post(&self, id: &str, actor_id: &str, draft: PostDraft) -> Result<Post> {
        draft.validate()?;
        let updated = {
            let mut inner = self.write();
            let post = inner
                .posts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| AppError::NotFound("post", id.to_string()))?;
            match Access::check_owner("post", &post.user_id, actor_id, id) {
                Access::Allowed => {}
                Access::Denied(reason) => return Err(AppError::Unauthorized(reason)),
            }
            post.title = draft.title;
            post.kind = draft.kind;
            post.quantity = draft.quantity;
            post.location = draft.location;
            post.images = draft.images;
            post.description = draft.description;
            post.updated_at = Utc::now();
            post.clone()
        };
        self.publish(Collection::Posts, ChangeKind::Updated, id);
        Ok(updated)
    }

    async fn complete_post(
        &self,
        id: &str,
        actor_id: &str,
        completion: Completion,
    ) -> Result<Exchange> {
        completion.validate()?;
        let exchange = {
            let mut inner = self.write();

            // All checks happen before any write so a failure mutates nothing.
            let post = inner
                .posts
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| AppError::NotFound("post", id.to_string()))?;
            match Access::check_owner("post", &post.user_id, actor_id, id) {
                Access::Allowed => {}
                Access::Denied(reason) => return Err(AppError::Unauthorized(reason)),
            }
            if post.status == PostStatus::Completed {
                return Err(AppError::InvalidState(format!(
                    "post {id} is already completed"
                )));
            }
            if !inner.users.iter().any(|u| u.id == completion.partner_id) {
                return Err(AppError::NotFound("user", completion.partner_id.clone()));
            }

            let now = Utc::now();
            let exchange = Exchange {
                id: new_id(),
                post_id: Some(post.id.clone()),
                request_id: None,
                giver_id: post.user_id.clone(),
                partner_id: completion.partner_id,
                plant_name: post.title.clone(),
                date: now,
                notes: completion.notes,
                kind: ExchangeKind::Post,
            };

            // Status flip and ledger append are one transaction under the
            // write lock: both happen or neither does.
            let post = inner.posts.iter_mut().find(|p| p.id == id).unwrap();
            post.status = PostStatus::Completed;
            post.updated_at = now;
            inner.exchanges.push(exchange.clone());
            exchange
        };
        self.publish(Collection::Posts, ChangeKind::Updated, id);
        self.publish(Collection::Exchanges, ChangeKind::Created, &exchange.id);
        Ok(exchange)
    }

    // ── Requests ─────────────────────────────────────────────────────────

    async fn list_requests(&self, filter: RequestFilter) -> Result<Vec<Request>> {
        let mut requests: Vec<Request> = self
            .read()
            .requests
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        sort_newest_first(&mut requests, |r| r.created_at);
        Ok(requests)
    }

    async fn get_request(&self, id: &str) -> Result<Option<Request>> {
        Ok(self.read().requests.iter().find(|r| r.id == id).cloned())
    }

    async fn create_request(&self, owner_id: &str, draft: RequestDraft) -> Result<Request> {
        draft.validate()?;
        let now = Utc::now();
        let request = Request {
            id: new_id(),
            user_id: owner_id.to_string(),
            plant_name: draft.plant_name,
            location: draft.location,
            reason: draft.reason,
            category: draft.category,
            quantity: draft.quantity,
            status: RequestStatus::Open,
            created_at: now,
            updated_at: now,
        };
        self.write().requests.push(request.clone());
        self.publish(Collection::Requests, ChangeKind::Created, &request.id);
        Ok(request)
    }

    async fn edit_request(
        &self,
        id: &str,
        actor_id: &str,
        draft: RequestDraft,
    ) -> Result<Request> {
        draft.validate()?;
        let updated = {
            let mut inner = self.write();
            let request = inner
                .requests
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| AppError::NotFound("request", id.to_string()))?;
            match Access::check_owner("request", &request.user_id, actor_id, id) {
                Access::Allowed => {}
                Access::Denied(reason) => return Err(AppError::Unauthorized(reason)),
            }
            request.plant_name = draft.plant_name;
            request.location = draft.location;
            request.reason = draft.reason;
            request.category = draft.category;
            request.quantity = draft.quantity;
            request.updated_at = Utc::now();
            request.clone()
        };
        self.publish(Collection::Requests, ChangeKind::Updated, id);
        Ok(updated)
    }

    async fn fulfill_request(
        &self,
        id: &str,
        actor_id: &str,
        completion: Completion,
    ) -> Result<Exchange> {
        completion.validate()?;
        let exchange = {
            let mut inner = self.write();

            let request = inner
                .requests
                .iter()
                .find(|r| r.id == id)
                .ok_or_else(|| AppError::NotFound("request", id.to_string()))?;
            match Access::check_owner("request", &request.user_id, actor_id, id) {
                Access::Allowed => {}
                Access::Denied(reason) => return Err(AppError::Unauthorized(reason)),
            }
            if request.status == RequestStatus::Fulfilled {
                return Err(AppError::InvalidState(format!(
                    "request {id} is already fulfilled"
                )));
            }
            if !inner.users.iter().any(|u| u.id == completion.partner_id) {
                return Err(AppError::NotFound("user", completion.partner_id.clone()));
            }

            let now = Utc::now();
            // On the request flow the giver is the partner who supplied the
            // plant; the requester receives.
            let exchange = Exchange {
                id: new_id(),
                post_id: None,
                request_id: Some(request.id.clone()),
                giver_id: completion.partner_id,
                partner_id: request.user_id.clone(),
                plant_name: request.plant_name.clone(),
                date: now,
                notes: completion.notes,
                kind: ExchangeKind::Request,
            };

            let request = inner.requests.iter_mut().find(|r| r.id == id).unwrap();
            request.status = RequestStatus::Fulfilled;
            request.updated_at = now;
            inner.exchanges.push(exchange.clone());
            exchange
        };
        self.publish(Collection::Requests, ChangeKind::Updated, id);
        self.publish(Collection::Exchanges, ChangeKind::Created, &exchange.id);
        Ok(exchange)
    }

    // ── Articles ─────────────────────────────────────────────────────────

    async fn list_articles(&self, filter: ArticleFilter) -> Result<Vec<Article>> {
        let mut articles: Vec<Article> = self
            .read()
            .articles
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        sort_newest_first(&mut articles, |a| a.created_at);
        Ok(articles)
    }

    async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        Ok(self.read().articles.iter().find(|a| a.id == id).cloned())
    }

    async fn create_article(&self, owner_id: &str, draft: ArticleDraft) -> Result<Article> {
        draft.validate()?;
        let now = Utc::now();
        let article = Article {
            id: new_id(),
            user_id: owner_id.to_string(),
            title: draft.title,
            content: draft.content,
            image: draft.image,
            category: draft.category,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        };
        self.write().articles.push(article.clone());
        self.publish(Collection::Articles, ChangeKind::Created, &article.id);
        Ok(article)
    }

    async fn edit_article(
        &self,
        id: &str,
        actor_id: &str,
        draft: ArticleDraft,
    ) -> Result<Article> {
        draft.validate()?;
        let updated = {
            let mut inner = self.write();
            let article = inner
                .articles
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| AppError::NotFound("article", id.to_string()))?;
            match Access::check_owner("article", &article.user_id, actor_id, id) {
                Access::Allowed => {}
                Access::Denied(reason) => return Err(AppError::Unauthorized(reason)),
            }
            article.title = draft.title;
            article.content = draft.content;
            article.image = draft.image;
            article.category = draft.category;
            article.tags = draft.tags;
            article.updated_at = Utc::now();
            article.clone()
        };
        self.publish(Collection::Articles, ChangeKind::Updated, id);
        Ok(updated)
    }

    // ── Comments ─────────────────────────────────────────────────────────

    async fn comments_for(
        &self,
        parent_kind: ParentKind,
        parent_id: &str,
    ) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .read()
            .comments
            .iter()
            .filter(|c| c.parent_kind == parent_kind && c.parent_id == parent_id)
            .cloned()
            .collect();
        // Conversation order: oldest first.
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn add_comment(
        &self,
        parent_kind: ParentKind,
        parent_id: &str,
        author_id: &str,
        draft: CommentDraft,
    ) -> Result<Comment> {
        draft.validate()?;
        let comment = {
            let mut inner = self.write();
            let parent_exists = match parent_kind {
                ParentKind::Post => inner.posts.iter().any(|p| p.id == parent_id),
                ParentKind::Request => inner.requests.iter().any(|r| r.id == parent_id),
            };
            if !parent_exists {
                let entity = match parent_kind {
                    ParentKind::Post => "post",
                    ParentKind::Request => "request",
                };
                return Err(AppError::NotFound(entity, parent_id.to_string()));
            }
            let comment = Comment {
                id: new_id(),
                user_id: author_id.to_string(),
                parent_id: parent_id.to_string(),
                parent_kind,
                content: draft.content,
                created_at: Utc::now(),
            };
            inner.comments.push(comment.clone());
            comment
        };
        self.publish(Collection::Comments, ChangeKind::Created, &comment.id);
        Ok(comment)
    }

    // ── Exchange ledger ──────────────────────────────────────────────────

    async fn list_exchanges(&self, filter: ExchangeFilter) -> Result<Vec<Exchange>> {
        let mut exchanges: Vec<Exchange> = self
            .read()
            .exchanges
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        sort_newest_first(&mut exchanges, |e| e.date);
        Ok(exchanges)
    }
}
