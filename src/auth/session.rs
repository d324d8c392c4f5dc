// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-role auth sessions.
//!
//! One session object per role is the single source of truth for "am I
//! logged in and as whom". The two roles are independent state machines,
//! but [`SessionManager`] enforces that at most one of them is signed in
//! at a time.

use std::sync::RwLock;

use chrono::Utc;

use crate::api::ApiClient;
use crate::auth::{claims, Role};
use crate::error::{ClientError, Result};
use crate::models::{CaptainProfile, UserProfile};
use crate::store::TokenStore;

/// Session lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState<P> {
    /// Startup restore or a login is in flight
    Loading,
    SignedOut,
    SignedIn(P),
}

impl<P> SessionState<P> {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, SessionState::SignedIn(_))
    }
}

/// Rider-side session.
pub struct RiderSession {
    api: ApiClient,
    store: TokenStore,
    state: RwLock<SessionState<UserProfile>>,
}

impl RiderSession {
    pub fn new(api: ApiClient, store: TokenStore) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(SessionState::Loading),
        }
    }

    pub fn state(&self) -> SessionState<UserProfile> {
        self.state.read().expect("session lock poisoned").clone()
    }

    /// Restore the session from the persisted token, if any.
    ///
    /// Expired or malformed tokens are discarded locally, with no profile
    /// request made.
    pub async fn restore(&self) -> Result<()> {
        let Some(token) = self.store.token(Role::Rider) else {
            self.set_state(SessionState::SignedOut);
            return Ok(());
        };

        match claims::decode_unverified(&token) {
            Ok(claims) if !claims.expired_at(Utc::now()) => self.fetch_profile().await,
            Ok(_) => {
                tracing::info!("Stored rider token expired, discarding");
                self.store.clear(Role::Rider).await?;
                self.set_state(SessionState::SignedOut);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Stored rider token invalid, discarding");
                self.store.clear(Role::Rider).await?;
                self.set_state(SessionState::SignedOut);
                Ok(())
            }
        }
    }

    /// Persist a freshly issued token and load the profile behind it.
    pub async fn login(&self, token: &str) -> Result<UserProfile> {
        self.set_state(SessionState::Loading);
        self.store.set_token(Role::Rider, token).await?;
        self.fetch_profile().await?;
        match self.state() {
            SessionState::SignedIn(profile) => Ok(profile),
            _ => Err(ClientError::Unauthorized),
        }
    }

    /// Log out: best-effort server invalidation, unconditional local clear.
    pub async fn logout(&self) -> Result<()> {
        if let Err(err) = self.api.logout_user().await {
            tracing::warn!(error = %err, "Rider logout API failed, proceeding with local logout");
        }
        self.store.clear(Role::Rider).await?;
        self.set_state(SessionState::SignedOut);
        Ok(())
    }

    /// Called when the HTTP layer exhausts token refresh for this role.
    pub fn handle_unauthorized(&self) {
        self.set_state(SessionState::SignedOut);
    }

    async fn fetch_profile(&self) -> Result<()> {
        match self.api.user_profile().await {
            Ok(profile) => {
                self.set_state(SessionState::SignedIn(profile));
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to fetch rider profile");
                self.logout().await
            }
        }
    }

    fn set_state(&self, state: SessionState<UserProfile>) {
        *self.state.write().expect("session lock poisoned") = state;
    }
}

/// Captain-side session. Mirrors [`RiderSession`] for the other role.
pub struct CaptainSession {
    api: ApiClient,
    store: TokenStore,
    state: RwLock<SessionState<CaptainProfile>>,
}

impl CaptainSession {
    pub fn new(api: ApiClient, store: TokenStore) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(SessionState::Loading),
        }
    }

    pub fn state(&self) -> SessionState<CaptainProfile> {
        self.state.read().expect("session lock poisoned").clone()
    }

    pub async fn restore(&self) -> Result<()> {
        let Some(token) = self.store.token(Role::Captain) else {
            self.set_state(SessionState::SignedOut);
            return Ok(());
        };

        match claims::decode_unverified(&token) {
            Ok(claims) if !claims.expired_at(Utc::now()) => self.fetch_profile().await,
            Ok(_) => {
                tracing::info!("Stored captain token expired, discarding");
                self.store.clear(Role::Captain).await?;
                self.set_state(SessionState::SignedOut);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Stored captain token invalid, discarding");
                self.store.clear(Role::Captain).await?;
                self.set_state(SessionState::SignedOut);
                Ok(())
            }
        }
    }

    pub async fn login(&self, token: &str) -> Result<CaptainProfile> {
        self.set_state(SessionState::Loading);
        self.store.set_token(Role::Captain, token).await?;
        self.fetch_profile().await?;
        match self.state() {
            SessionState::SignedIn(profile) => Ok(profile),
            _ => Err(ClientError::Unauthorized),
        }
    }

    pub async fn logout(&self) -> Result<()> {
        if let Err(err) = self.api.logout_captain().await {
            tracing::warn!(error = %err, "Captain logout API failed, proceeding with local logout");
        }
        self.store.clear(Role::Captain).await?;
        self.set_state(SessionState::SignedOut);
        Ok(())
    }

    pub fn handle_unauthorized(&self) {
        self.set_state(SessionState::SignedOut);
    }

    async fn fetch_profile(&self) -> Result<()> {
        match self.api.captain_profile().await {
            Ok(profile) => {
                self.set_state(SessionState::SignedIn(profile));
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to fetch captain profile");
                self.logout().await
            }
        }
    }

    fn set_state(&self, state: SessionState<CaptainProfile>) {
        *self.state.write().expect("session lock poisoned") = state;
    }
}

/// Owns both role sessions and enforces the at-most-one-active invariant.
pub struct SessionManager {
    pub rider: RiderSession,
    pub captain: CaptainSession,
}

impl SessionManager {
    pub fn new(api: ApiClient, store: TokenStore) -> Self {
        Self {
            rider: RiderSession::new(api.clone(), store.clone()),
            captain: CaptainSession::new(api, store),
        }
    }

    /// Restore at most one role from persisted tokens.
    ///
    /// The rider slot is tried first; if it signs in, a valid captain
    /// token stays stored but the captain session remains signed out.
    pub async fn restore_all(&self) -> Result<()> {
        self.rider.restore().await?;
        if self.rider.state().is_signed_in() {
            // Captain token (if any) stays stored; its session resolves
            // to signed out while the rider is active.
            self.captain.handle_unauthorized();
            return Ok(());
        }
        self.captain.restore().await
    }

    /// Rider login, rejected while the captain session is active.
    pub async fn login_rider(&self, token: &str) -> Result<UserProfile> {
        if self.captain.state().is_signed_in() {
            return Err(ClientError::RoleConflict);
        }
        self.rider.login(token).await
    }

    /// Captain login, rejected while the rider session is active.
    pub async fn login_captain(&self, token: &str) -> Result<CaptainProfile> {
        if self.rider.state().is_signed_in() {
            return Err(ClientError::RoleConflict);
        }
        self.captain.login(token).await
    }

    /// The role currently signed in, if any.
    pub fn active_role(&self) -> Option<Role> {
        if self.rider.state().is_signed_in() {
            Some(Role::Rider)
        } else if self.captain.state().is_signed_in() {
            Some(Role::Captain)
        } else {
            None
        }
    }
}
