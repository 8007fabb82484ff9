//! # Domain Models
//!
//! These structs represent the core entities of EcoCropShare.
//! Identifiers are opaque strings: seed fixtures use short numerals, while
//! everything created at runtime gets a UUID v7 for time-ordered uniqueness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a fresh entity id. UUID v7 keeps ids sortable by creation time
/// and removes the collision risk of millisecond-derived ids.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// A community member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Unique across the collection; matching is exact (case-sensitive).
    pub email: String,
    pub location: String,
    pub favorite_plants: Vec<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// What a post offers: seeds to plant, or surplus from a harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Seed,
    Harvest,
}

/// Post lifecycle. The transition is one-directional: available → completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Available,
    Completed,
}

/// A listing offering a seed batch or harvest surplus for sharing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub kind: PostKind,
    pub quantity: u32,
    pub location: String,
    /// Opaque image URIs; media handling is out of scope.
    pub images: Vec<String>,
    pub description: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request lifecycle. One-directional: open → fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Open,
    Fulfilled,
}

/// A listing describing a plant/seed need.
///
/// `category` and `quantity` are part of the canonical schema here; the
/// create/edit forms always supplied them even though older records may not
/// carry them, hence the `Option`s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    pub user_id: String,
    pub plant_name: String,
    pub location: String,
    pub reason: String,
    pub category: Option<String>,
    pub quantity: Option<u32>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which entity a comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentKind {
    Post,
    Request,
}

/// A comment under a post or request. Comments live in their own collection;
/// parents never embed copies, so a read always reflects the latest state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub parent_id: String,
    pub parent_kind: ParentKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A community knowledge article. Content is plain text with blank-line
/// paragraph breaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which flow produced an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    Post,
    Request,
}

/// A record of a completed exchange linking a giver and a receiver.
///
/// Invariant: exactly one of `post_id` / `request_id` is set, and it matches
/// `kind`. The store only ever writes these as part of a completion, so the
/// ledger cannot drift from the listing statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub id: String,
    pub post_id: Option<String>,
    pub request_id: Option<String>,
    /// The giver.
    pub giver_id: String,
    /// The receiver.
    pub partner_id: String,
    pub plant_name: String,
    pub date: DateTime<Utc>,
    pub notes: String,
    pub kind: ExchangeKind,
}

/// Outcome of an ownership check. An explicit result type lets callers decide
/// whether to redirect, surface a message, or log, instead of the domain
/// layer baking in a UI decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(DeniedReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeniedReason {
    /// The acting user is not the entity's owner.
    NotOwner { entity: &'static str, id: String },
}

impl Access {
    /// Grants access iff `actor_id` owns the entity.
    pub fn check_owner(entity: &'static str, owner_id: &str, actor_id: &str, id: &str) -> Access {
        if owner_id == actor_id {
            Access::Allowed
        } else {
            Access::Denied(DeniedReason::NotOwner {
                entity,
                id: id.to_string(),
            })
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed)
    }
}

impl std::fmt::Display for DeniedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeniedReason::NotOwner { entity, id } => {
                write!(f, "not the owner of {entity} {id}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_ordered() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        // v7 ids embed a timestamp, so later ids sort after earlier ones.
        assert!(a < b);
    }

    #[test]
    fn owner_check_allows_only_the_owner() {
        assert!(Access::check_owner("post", "1", "1", "p1").is_allowed());
        let denied = Access::check_owner("post", "1", "2", "p1");
        assert_eq!(
            denied,
            Access::Denied(DeniedReason::NotOwner {
                entity: "post",
                id: "p1".into()
            })
        );
    }

    #[test]
    fn status_enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&PostStatus::Available).unwrap(),
            "\"available\""
        );
        assert_eq!(
            serde_json::to_string(&PostKind::Harvest).unwrap(),
            "\"harvest\""
        );
        assert_eq!(
            serde_json::to_string(&RequestStatus::Fulfilled).unwrap(),
            "\"fulfilled\""
        );
    }
}
