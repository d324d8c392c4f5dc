// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! RideOnCabio headless client.
//!
//! Restores a persisted session (or logs in from `CABIO_EMAIL` /
//! `CABIO_PASSWORD` / `CABIO_ROLE`), connects the socket relay, joins as
//! the active role, and logs ride-lifecycle events until interrupted.

use std::sync::Arc;
use std::time::Duration;

use cabio_client::{
    api::LoginRequest,
    auth::{Role, SessionState},
    config::Config,
    models::DEFAULT_CENTER,
    services::{CaptainFlow, RiderFlow, StaticLocation},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(api = %config.api_base_url, socket = %config.socket_url, "Starting RideOnCabio client");

    let state = AppState::from_config(config)
        .await
        .expect("Failed to initialize client");

    // Restore at most one role from persisted tokens.
    state.sessions.restore_all().await?;

    // Fall back to credential login from the environment.
    if state.sessions.active_role().is_none() {
        if let (Ok(email), Ok(password)) = (std::env::var("CABIO_EMAIL"), std::env::var("CABIO_PASSWORD")) {
            let request = LoginRequest { email, password };
            let role = match std::env::var("CABIO_ROLE").as_deref() {
                Ok("captain") => Role::Captain,
                _ => Role::Rider,
            };
            match role {
                Role::Rider => {
                    let auth = state.api.login_user(&request).await?;
                    state.sessions.login_rider(&auth.token).await?;
                }
                Role::Captain => {
                    let auth = state.api.login_captain(&request).await?;
                    state.sessions.login_captain(&auth.token).await?;
                }
            }
        }
    }

    let Some(role) = state.sessions.active_role() else {
        tracing::warn!("No session available; set CABIO_EMAIL/CABIO_PASSWORD to log in");
        return Ok(());
    };

    state.relay.connect().await?;

    // Keep the flow alive for the lifetime of the connection; its
    // subscriptions log every lifecycle event as it arrives.
    let _rider_flow;
    let _captain_flow;

    match role {
        Role::Rider => {
            let SessionState::SignedIn(profile) = state.sessions.rider.state() else {
                unreachable!("active role implies a signed-in session");
            };
            state.relay.join(&profile.id, Role::Rider).await;
            let flow = RiderFlow::new(state.api.clone(), Arc::clone(&state.relay), profile.id);
            flow.subscribe();
            tracing::info!(rider = %profile.fullname.firstname, "Rider session ready");
            _rider_flow = flow;
        }
        Role::Captain => {
            let SessionState::SignedIn(profile) = state.sessions.captain.state() else {
                unreachable!("active role implies a signed-in session");
            };
            state.relay.join(&profile.id, Role::Captain).await;
            let flow = CaptainFlow::new(
                state.api.clone(),
                Arc::clone(&state.relay),
                profile.id,
                Arc::new(StaticLocation(DEFAULT_CENTER)),
                Duration::from_secs(state.config.location_update_interval_secs),
            );
            flow.subscribe();
            flow.set_online(true).await?;
            tracing::info!(captain = %profile.fullname.firstname, "Captain session ready, online");
            _captain_flow = flow;
        }
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    state.relay.disconnect().await;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cabio_client=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
