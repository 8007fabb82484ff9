//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary. The
//! repository hands out copies, never references into its own state, so a
//! caller can never corrupt the backing collections.

use async_trait::async_trait;

use crate::drafts::{
    ArticleDraft, CommentDraft, Completion, NewUser, PostDraft, ProfileUpdate, RequestDraft,
};
use crate::error::Result;
use crate::models::{Article, Comment, Exchange, ParentKind, Post, Request, User};
use crate::query::{ArticleFilter, ExchangeFilter, PostFilter, RequestFilter};

/// Data contract for the five entity collections.
///
/// List operations return newest-first. Mutations validate their drafts,
/// enforce ownership, and perform no partial writes: a failed call leaves
/// every collection untouched.
#[async_trait]
pub trait ShareRepo: Send + Sync {
    // User operations
    async fn get_user(&self, id: &str) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    /// Appends a fully-formed user. Fails with `Conflict` on a duplicate
    /// email (exact, case-sensitive match).
    async fn create_user(&self, user: User) -> Result<User>;
    /// Overwrites the editable profile fields and bumps nothing else.
    /// Re-checks email uniqueness against every *other* user.
    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User>;

    // Post operations
    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>>;
    async fn get_post(&self, id: &str) -> Result<Option<Post>>;
    async fn create_post(&self, owner_id: &str, draft: PostDraft) -> Result<Post>;
    /// Owner-only; merges the draft and bumps `updated_at`.
    async fn edit_post(&self, id: &str, actor_id: &str, draft: PostDraft) -> Result<Post>;
    /// Owner-only; atomically flips the status to completed AND appends the
    /// exchange record. Fails without mutating if the post is already
    /// completed or the partner does not exist.
    async fn complete_post(&self, id: &str, actor_id: &str, completion: Completion)
        -> Result<Exchange>;

    // Request operations
    async fn list_requests(&self, filter: RequestFilter) -> Result<Vec<Request>>;
    async fn get_request(&self, id: &str) -> Result<Option<Request>>;
    async fn create_request(&self, owner_id: &str, draft: RequestDraft) -> Result<Request>;
    async fn edit_request(&self, id: &str, actor_id: &str, draft: RequestDraft)
        -> Result<Request>;
    /// The request-side twin of `complete_post`: open → fulfilled plus the
    /// ledger append, as one transaction.
    async fn fulfill_request(&self, id: &str, actor_id: &str, completion: Completion)
        -> Result<Exchange>;

    // Article operations
    async fn list_articles(&self, filter: ArticleFilter) -> Result<Vec<Article>>;
    async fn get_article(&self, id: &str) -> Result<Option<Article>>;
    async fn create_article(&self, owner_id: &str, draft: ArticleDraft) -> Result<Article>;
    async fn edit_article(&self, id: &str, actor_id: &str, draft: ArticleDraft)
        -> Result<Article>;

    // Comment operations
    /// Comments for one parent, oldest-first (conversation order).
    async fn comments_for(&self, parent_kind: ParentKind, parent_id: &str)
        -> Result<Vec<Comment>>;
    /// Appends a comment; the parent must exist.
    async fn add_comment(
        &self,
        parent_kind: ParentKind,
        parent_id: &str,
        author_id: &str,
        draft: CommentDraft,
    ) -> Result<Comment>;

    // Exchange ledger
    async fn list_exchanges(&self, filter: ExchangeFilter) -> Result<Vec<Exchange>>;
}

/// Durable single-slot cache holding the serialized session user.
/// Written on login/register/profile-update, read once at startup, deleted
/// on logout.
#[async_trait]
pub trait SessionCache: Send + Sync {
    async fn load(&self) -> anyhow::Result<Option<User>>;
    async fn save(&self, user: &User) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
}

/// Identity contract. Failure is signalled by `false` / `None`; these calls
/// never raise for a wrong email or password.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// True iff a user with this exact email exists. The password is
    /// accepted unconditionally — mock behavior, kept on purpose.
    async fn login(&self, email: &str, password: &str) -> Result<bool>;
    /// False on duplicate email; otherwise creates the user, installs it as
    /// the session, and persists it.
    async fn register(&self, new_user: NewUser) -> Result<bool>;
    async fn logout(&self) -> Result<()>;
    async fn current(&self) -> Option<User>;
    /// Installs a cached session at startup, if one exists.
    async fn restore(&self) -> Result<()>;
    /// Replaces the in-memory session after a profile edit and re-persists.
    async fn refresh(&self, user: User) -> Result<()>;
}
