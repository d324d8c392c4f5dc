// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! RideOnCabio client: auth sessions, REST API access, and the real-time
//! ride-lifecycle relay for the rider and captain roles.
//!
//! The crate is a headless SDK: an embedding application supplies the
//! rendering and the geolocation source, and drives [`services::RiderFlow`]
//! or [`services::CaptainFlow`] against a shared [`socket::SocketRelay`].

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod map;
pub mod models;
pub mod services;
pub mod socket;
pub mod store;

use std::sync::Arc;

use api::ApiClient;
use auth::SessionManager;
use config::Config;
use error::Result;
use socket::SocketRelay;
use store::TokenStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: TokenStore,
    pub api: ApiClient,
    pub relay: Arc<SocketRelay>,
    pub sessions: SessionManager,
}

impl AppState {
    /// Wire up the client stack for a configuration.
    pub async fn from_config(config: Config) -> Result<Self> {
        let store = TokenStore::open(&config.token_store_path).await;
        let api = ApiClient::new(&config.api_base_url, store.clone())?;
        let relay = Arc::new(SocketRelay::new(&config.socket_url));
        let sessions = SessionManager::new(api.clone(), store.clone());

        Ok(Self {
            config,
            store,
            api,
            relay,
            sessions,
        })
    }
}
