// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client wrapper with bearer auth and single-flight token refresh.
//!
//! Every authenticated request attaches the current token for its role.
//! On a 401 the client refreshes the role's token exactly once and
//! replays the request; concurrent requests that 401 while a refresh is
//! in flight wait on the role's refresh lock and settle together with the
//! refresh outcome. All refresh state is keyed by role, so an active
//! rider session and an active captain session cannot contaminate each
//! other's retries.

use std::sync::Arc;

use dashmap::DashMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::auth::Role;
use crate::error::{ClientError, Result};
use crate::store::TokenStore;

/// Per-role mutex that serializes token refresh operations.
type RefreshLocks = Arc<DashMap<Role, Arc<Mutex<()>>>>;

/// REST client for the backend API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: TokenStore,
    refresh_locks: RefreshLocks,
}

/// Refresh endpoint response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
}

impl ApiClient {
    /// Create a client against `base_url`.
    ///
    /// The cookie store carries the HTTP-only refresh credential the
    /// backend sets at login, which is what the refresh endpoint
    /// authenticates against.
    pub fn new(base_url: impl Into<String>, store: TokenStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Internal(anyhow::anyhow!("HTTP client init: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            refresh_locks: Arc::new(DashMap::new()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Request helpers ─────────────────────────────────────────────────────

    /// Authenticated GET returning JSON.
    pub(crate) async fn get_authed<T: DeserializeOwned>(
        &self,
        role: Role,
        path: &str,
    ) -> Result<T> {
        self.authed_json(role, Method::GET, path, None::<&()>).await
    }

    /// Authenticated POST with a JSON body, returning JSON.
    pub(crate) async fn post_authed<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        role: Role,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.authed_json(role, Method::POST, path, Some(body)).await
    }

    /// Authenticated POST where the response body is irrelevant.
    pub(crate) async fn post_authed_no_content(&self, role: Role, path: &str) -> Result<()> {
        let empty = serde_json::json!({});
        let token = self.store.token(role);
        let response = self
            .dispatch(Method::POST, path, Some(&empty), token.as_deref())
            .await?;

        if response.status().as_u16() != 401 {
            return Self::check_status(response).await;
        }

        let token = self.refreshed_token(role, token).await?;
        let response = self
            .dispatch(Method::POST, path, Some(&empty), Some(token.as_str()))
            .await?;
        Self::check_status(response).await
    }

    /// Unauthenticated POST (login/register), returning JSON.
    pub(crate) async fn post_public<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.dispatch(Method::POST, path, Some(body), None).await?;
        Self::check_json(response).await
    }

    // ─── 401 handling ────────────────────────────────────────────────────────

    async fn authed_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        role: Role,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let token = self.store.token(role);
        let response = self
            .dispatch(method.clone(), path, body, token.as_deref())
            .await?;

        if response.status().as_u16() != 401 {
            return Self::check_json(response).await;
        }

        // Not already retried: refresh this role's token and replay once.
        let token = self.refreshed_token(role, token).await?;
        let response = self
            .dispatch(method, path, body, Some(token.as_str()))
            .await?;
        Self::check_json(response).await
    }

    /// Produce a token that is fresher than `used`, refreshing if nobody
    /// else already has.
    ///
    /// Callers queue on the role's refresh lock. After acquiring it:
    /// - the stored token changed → another task's refresh settled
    ///   successfully, reuse its result;
    /// - the stored token is gone → another task's refresh settled with a
    ///   failure and discarded the slot, reject without a second attempt;
    /// - otherwise this task performs the refresh itself.
    async fn refreshed_token(&self, role: Role, used: Option<String>) -> Result<String> {
        let lock = self
            .refresh_locks
            .entry(role)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let _guard = lock.lock().await;

        match (self.store.token(role), &used) {
            (Some(current), Some(prev)) if current != *prev => return Ok(current),
            (Some(current), None) => return Ok(current),
            (None, Some(_)) => return Err(ClientError::Unauthorized),
            _ => {}
        }

        match self.refresh(role).await {
            Ok(token) => {
                self.store.set_token(role, &token).await?;
                tracing::info!(role = %role, "Access token refreshed");
                Ok(token)
            }
            Err(err) => {
                tracing::warn!(role = %role, error = %err, "Token refresh failed, discarding stored token");
                self.store.clear(role).await?;
                Err(ClientError::Unauthorized)
            }
        }
    }

    /// Call the role's refresh endpoint. Authenticated by the refresh
    /// cookie, never by the (stale) bearer token.
    async fn refresh(&self, role: Role) -> Result<String> {
        let path = format!("/{}/refresh-token", role.api_prefix());
        let empty = serde_json::json!({});
        let response = self.dispatch(Method::POST, &path, Some(&empty), None).await?;
        let refreshed: RefreshResponse = Self::check_json(response).await?;
        Ok(refreshed.access_token)
    }

    // ─── Plumbing ────────────────────────────────────────────────────────────

    async fn dispatch<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Check response status and parse the JSON body.
    async fn check_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("JSON parse error: {}", e)))
    }

    /// Check response status, discarding any body.
    async fn check_status(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status.as_u16(), body))
    }
}
