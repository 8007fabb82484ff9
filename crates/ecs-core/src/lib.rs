//! ecocropshare/crates/ecs-core/src/lib.rs
//!
//! The central domain logic and interface definitions for EcoCropShare.

pub mod drafts;
pub mod error;
pub mod models;
pub mod query;
pub mod traits;

// Re-exporting for easier access in other crates
pub use drafts::*;
pub use error::*;
pub use models::*;
pub use query::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use chrono::Utc;

    #[test]
    fn test_post_creation() {
        let id = new_id();
        let now = Utc::now();
        let post = Post {
            id: id.clone(),
            user_id: "1".to_string(),
            title: "Bibit Tomat Cherry".to_string(),
            kind: PostKind::Seed,
            quantity: 20,
            location: "Jakarta Selatan".to_string(),
            images: vec![],
            description: "Siap tanam.".to_string(),
            status: PostStatus::Available,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(post.id, id);
        assert_eq!(post.status, PostStatus::Available);
        assert_eq!(post.created_at, post.updated_at);
    }
}
