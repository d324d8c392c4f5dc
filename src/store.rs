// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistent per-role token storage.
//!
//! The browser client keeps one bearer token per role in local storage;
//! this is the same thing as a small JSON file fronted by an in-memory
//! cache. Corrupt or missing files degrade to empty slots.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dashmap::DashMap;

use crate::auth::Role;
use crate::error::{ClientError, Result};

/// Storage keys, one slot per role.
mod keys {
    pub const USER_TOKEN: &str = "userToken";
    pub const CAPTAIN_TOKEN: &str = "captainToken";
}

fn storage_key(role: Role) -> &'static str {
    match role {
        Role::Rider => keys::USER_TOKEN,
        Role::Captain => keys::CAPTAIN_TOKEN,
    }
}

/// File-backed token store with an in-memory cache.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
    cache: std::sync::Arc<DashMap<&'static str, String>>,
}

impl TokenStore {
    /// Open the store, loading any previously persisted tokens.
    pub async fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let cache = std::sync::Arc::new(DashMap::new());

        match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<HashMap<String, String>>(&bytes) {
                Ok(slots) => {
                    for (key, token) in slots {
                        for known in [keys::USER_TOKEN, keys::CAPTAIN_TOKEN] {
                            if key == known {
                                cache.insert(known, token.clone());
                            }
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "Token store corrupt, starting empty");
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Token store unreadable, starting empty");
            }
        }

        Self { path, cache }
    }

    /// The stored token for a role, if any.
    pub fn token(&self, role: Role) -> Option<String> {
        self.cache
            .get(storage_key(role))
            .map(|entry| entry.value().clone())
    }

    /// Persist a token for a role, replacing any previous one.
    pub async fn set_token(&self, role: Role, token: &str) -> Result<()> {
        self.cache.insert(storage_key(role), token.to_string());
        self.persist().await
    }

    /// Discard the token for a role.
    pub async fn clear(&self, role: Role) -> Result<()> {
        self.cache.remove(storage_key(role));
        self.persist().await
    }

    /// Write the slots out through a temp-file rename.
    async fn persist(&self) -> Result<()> {
        let slots: HashMap<&str, String> = self
            .cache
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let bytes = serde_json::to_vec_pretty(&slots)
            .map_err(|e| ClientError::Storage(format!("serialize: {}", e)))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| ClientError::Storage(format!("write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| ClientError::Storage(format!("rename {}: {}", self.path.display(), e)))?;
        Ok(())
    }
}
