// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::time::Duration;

use cabio_client::api::ApiClient;
use cabio_client::models::{Ride, RideStatus, VehicleType};
use cabio_client::store::TokenStore;
use serde::Serialize;
use tokio::net::TcpListener;

/// Mint a bearer token expiring `exp_offset_secs` from now. The signing
/// key is arbitrary; the client never verifies signatures.
#[allow(dead_code)]
pub fn make_token(exp_offset_secs: i64) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        iat: usize,
    }

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "652f1a2b3c4d5e6f7a8b9c0d".to_string(),
        exp: (now + exp_offset_secs) as usize,
        iat: now as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"backend-signing-key-unknown-to-client"),
    )
    .expect("Failed to create test token")
}

/// A ride snapshot as the server would report it.
#[allow(dead_code)]
pub fn make_ride(id: &str, status: RideStatus) -> Ride {
    Ride {
        id: id.to_string(),
        pickup: "A".to_string(),
        destination: "B".to_string(),
        fare: 120.0,
        vehicle_type: VehicleType::Car,
        status,
        otp: None,
        captain: None,
        user: None,
    }
}

/// Open an `ApiClient` + `TokenStore` pair against a mock server base URL.
#[allow(dead_code)]
pub async fn test_client(base_url: &str, dir: &tempfile::TempDir) -> (ApiClient, TokenStore) {
    let store = TokenStore::open(dir.path().join("tokens.json")).await;
    let api = ApiClient::new(base_url, store.clone()).expect("Failed to build API client");
    (api, store)
}

/// Bind a websocket test server socket, returning the listener and its
/// `ws://` URL.
#[allow(dead_code)]
pub async fn bind_ws() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let url = format!("ws://{}", listener.local_addr().expect("local addr"));
    (listener, url)
}

/// Poll `condition` until it holds or a short deadline passes.
#[allow(dead_code)]
pub async fn wait_for(what: &str, condition: impl Fn() -> bool) {
    for _ in 0..250 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Timed out waiting for: {}", what);
}
