//! # ecs-session-file
//!
//! File-backed implementation of `SessionCache`: one JSON file holding the
//! serialized session user. Written on login/register/profile-update, read
//! once at startup, deleted on logout. No schema versioning.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use ecs_core::models::User;
use ecs_core::traits::SessionCache;

pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionCache for FileSessionCache {
    /// Reads the cached user. A missing file means "logged out"; a file that
    /// no longer parses is treated the same way rather than failing startup.
    async fn load(&self) -> anyhow::Result<Option<User>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                log::warn!(
                    "session cache at {} is unreadable ({e}); starting logged out",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, serde_json::to_vec(user)?).await?;
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
