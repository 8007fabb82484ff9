//! # Write-side Drafts
//!
//! Input shapes for every mutation, each carrying its own validation.
//! Validation failures come back as a field-keyed map so callers can surface
//! messages next to the offending input; nothing is mutated on failure.

use serde::Deserialize;

use crate::error::{FieldErrors, Result};
use crate::models::{PostKind, User};

/// Minimum length for a request's free-text reason.
pub const MIN_REASON_LEN: usize = 10;
/// Minimum length for an article body.
pub const MIN_ARTICLE_LEN: usize = 100;

/// Loose email shape check: something before the `@`, a domain with a dot,
/// and no whitespace anywhere. Deliberately not RFC-grade.
fn email_looks_valid(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Registration input. The password is collected for API fidelity but never
/// verified anywhere; login is an email-presence check by design.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub location: String,
    #[serde(default)]
    pub favorite_plants: Vec<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.push("name", "name is required");
        }
        if self.email.trim().is_empty() {
            errors.push("email", "email is required");
        } else if !email_looks_valid(&self.email) {
            errors.push("email", "email format is invalid");
        }
        if self.password.trim().is_empty() {
            errors.push("password", "password is required");
        }
        if self.location.trim().is_empty() {
            errors.push("location", "location is required");
        }
        errors.into_result()
    }
}

/// Profile edit input. Same shape as the register form minus the password.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub location: String,
    #[serde(default)]
    pub favorite_plants: Vec<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.push("name", "name is required");
        }
        if self.email.trim().is_empty() {
            errors.push("email", "email is required");
        } else if !email_looks_valid(&self.email) {
            errors.push("email", "email format is invalid");
        }
        if self.location.trim().is_empty() {
            errors.push("location", "location is required");
        }
        errors.into_result()
    }

    /// Merges the edit into an existing user record. Id and created_at are
    /// never touched.
    pub fn apply_to(&self, user: &mut User) {
        user.name = self.name.clone();
        user.email = self.email.clone();
        user.location = self.location.clone();
        user.favorite_plants = self.favorite_plants.clone();
        user.profile_image = self.profile_image.clone();
    }
}

/// Create/edit input for a post. Edits reuse the full shape, mirroring the
/// create form.
#[derive(Debug, Clone, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub kind: PostKind,
    pub quantity: u32,
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub description: String,
}

impl PostDraft {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.push("title", "title is required");
        }
        if self.quantity == 0 {
            errors.push("quantity", "quantity must be greater than 0");
        }
        if self.location.trim().is_empty() {
            errors.push("location", "location is required");
        }
        if self.description.trim().is_empty() {
            errors.push("description", "description is required");
        }
        errors.into_result()
    }
}

/// Create/edit input for a request.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestDraft {
    pub plant_name: String,
    pub location: String,
    pub reason: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl RequestDraft {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.plant_name.trim().is_empty() {
            errors.push("plant_name", "plant name is required");
        }
        if self.location.trim().is_empty() {
            errors.push("location", "location is required");
        }
        if self.reason.trim().is_empty() {
            errors.push("reason", "reason is required");
        } else if self.reason.chars().count() < MIN_REASON_LEN {
            errors.push(
                "reason",
                format!("reason is too short (min. {MIN_REASON_LEN} characters)"),
            );
        }
        if let Some(0) = self.quantity {
            errors.push("quantity", "quantity must be at least 1");
        }
        errors.into_result()
    }
}

/// Create/edit input for an article.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ArticleDraft {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.push("title", "title is required");
        }
        if self.content.trim().is_empty() {
            errors.push("content", "content is required");
        } else if self.content.chars().count() < MIN_ARTICLE_LEN {
            errors.push(
                "content",
                format!("content is too short (min. {MIN_ARTICLE_LEN} characters)"),
            );
        }
        errors.into_result()
    }
}

/// Input for marking a post completed or a request fulfilled. The partner and
/// notes are persisted into the exchange ledger as one transaction with the
/// status flip.
#[derive(Debug, Clone, Deserialize)]
pub struct Completion {
    pub partner_id: String,
    #[serde(default)]
    pub notes: String,
}

impl Completion {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.partner_id.trim().is_empty() {
            errors.push("partner_id", "exchange partner is required");
        }
        errors.into_result()
    }
}

/// New comment input.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentDraft {
    pub content: String,
}

impl CommentDraft {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.content.trim().is_empty() {
            errors.push("content", "comment content is required");
        }
        errors.into_result()
    }
}
