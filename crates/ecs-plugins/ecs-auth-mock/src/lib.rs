//! # ecs-auth-mock
//!
//! Mock implementation of `Authenticator`. Login only checks that a user
//! with the given email exists; the password is never verified. A small
//! artificial delay stands in for network latency so calling code exercises
//! its real async paths. This is demo plumbing, not security.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use ecs_core::drafts::NewUser;
use ecs_core::error::{AppError, Result};
use ecs_core::models::{new_id, User};
use ecs_core::traits::{Authenticator, SessionCache, ShareRepo};

/// Simulated network latency for login.
const LOGIN_DELAY: Duration = Duration::from_millis(500);
/// Simulated network latency for registration.
const REGISTER_DELAY: Duration = Duration::from_millis(800);

pub struct MockAuthenticator {
    repo: Arc<dyn ShareRepo>,
    cache: Arc<dyn SessionCache>,
    session: RwLock<Option<User>>,
    login_delay: Duration,
    register_delay: Duration,
}

impl MockAuthenticator {
    pub fn new(repo: Arc<dyn ShareRepo>, cache: Arc<dyn SessionCache>) -> Self {
        Self::with_latency(repo, cache, LOGIN_DELAY, REGISTER_DELAY)
    }

    /// Constructor with explicit delays. Tests pass zero to stay fast.
    pub fn with_latency(
        repo: Arc<dyn ShareRepo>,
        cache: Arc<dyn SessionCache>,
        login_delay: Duration,
        register_delay: Duration,
    ) -> Self {
        Self {
            repo,
            cache,
            session: RwLock::new(None),
            login_delay,
            register_delay,
        }
    }

    async fn install(&self, user: User) -> Result<()> {
        self.cache
            .save(&user)
            .await
            .map_err(|e| AppError::Internal(format!("session cache write failed: {e}")))?;
        *self.session.write().await = Some(user);
        Ok(())
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn login(&self, email: &str, _password: &str) -> Result<bool> {
        // The delay runs whether or not the email matches, like a round-trip
        // would.
        tokio::time::sleep(self.login_delay).await;

        match self.repo.find_user_by_email(email).await? {
            Some(user) => {
                log::info!("login ok for {email}");
                self.install(user).await?;
                Ok(true)
            }
            None => {
                log::info!("login rejected for {email}: no such user");
                Ok(false)
            }
        }
    }

    async fn register(&self, new_user: NewUser) -> Result<bool> {
        new_user.validate()?;

        // Duplicate emails fail fast, before the simulated round-trip.
        if self.repo.find_user_by_email(&new_user.email).await?.is_some() {
            log::info!("registration rejected: {} already exists", new_user.email);
            return Ok(false);
        }

        tokio::time::sleep(self.register_delay).await;

        let user = User {
            id: new_id(),
            name: new_user.name,
            email: new_user.email,
            location: new_user.location,
            favorite_plants: new_user.favorite_plants,
            profile_image: new_user.profile_image,
            created_at: Utc::now(),
        };

        let user = match self.repo.create_user(user).await {
            Ok(user) => user,
            // Lost a race on the email; same outcome as the early check.
            Err(AppError::Conflict(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        log::info!("registered {} ({})", user.email, user.id);
        self.install(user).await?;
        Ok(true)
    }

    async fn logout(&self) -> Result<()> {
        *self.session.write().await = None;
        self.cache
            .clear()
            .await
            .map_err(|e| AppError::Internal(format!("session cache clear failed: {e}")))?;
        Ok(())
    }

    async fn current(&self) -> Option<User> {
        self.session.read().await.clone()
    }

    async fn restore(&self) -> Result<()> {
        // No validation against the user collection: a cached session is
        // trusted as-is, matching the single-slot cache contract.
        let cached = self
            .cache
            .load()
            .await
            .map_err(|e| AppError::Internal(format!("session cache read failed: {e}")))?;
        if let Some(user) = cached {
            log::info!("restored session for {}", user.email);
            *self.session.write().await = Some(user);
        }
        Ok(())
    }

    async fn refresh(&self, user: User) -> Result<()> {
        self.install(user).await
    }
}
