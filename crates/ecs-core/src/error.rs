//! # AppError
//!
//! Centralized error handling for the EcoCropShare ecosystem.
//! Maps domain-specific failures to actionable error types.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::DeniedReason;

/// Field-keyed validation messages, e.g. `{"quantity": "must be at least 1"}`.
/// Kept ordered so error output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FieldErrors(pub BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `Ok(())` when no field failed, otherwise the collected map.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

/// The primary error type for all ecs-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g. Post, Request, Article)
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    /// Validation failure, keyed per input field
    #[error("validation error: {0}")]
    Validation(FieldErrors),

    /// Ownership/authorization failure
    #[error("unauthorized: {0}")]
    Unauthorized(DeniedReason),

    /// Resource already exists (e.g. duplicate email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Illegal lifecycle transition (e.g. completing twice)
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Infrastructure failure (e.g. session cache unreadable)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a single-field validation error.
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(field, message);
        AppError::Validation(errors)
    }
}

/// A specialized Result type for EcoCropShare logic.
pub type Result<T> = std::result::Result<T, AppError>;
