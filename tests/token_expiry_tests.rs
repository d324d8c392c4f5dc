// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session restore must never treat an expired token as valid: expired or
//! malformed tokens are discarded locally with no profile request made.

use cabio_client::auth::session::{RiderSession, SessionState};
use cabio_client::auth::Role;
use httpmock::prelude::*;
use serde_json::json;

mod common;

fn rider_profile_json() -> serde_json::Value {
    json!({
        "_id": "652f1a2b3c4d5e6f7a8b9c0d",
        "fullname": { "firstname": "Asha", "lastname": "K" },
        "email": "asha@example.com"
    })
}

#[tokio::test]
async fn test_expired_token_presents_signed_out_without_profile_request() {
    let server = MockServer::start();
    let profile_mock = server.mock(|when, then| {
        when.method(GET).path("/users/profile");
        then.status(200).json_body(rider_profile_json());
    });

    let dir = tempfile::tempdir().unwrap();
    let (api, store) = common::test_client(&server.base_url(), &dir).await;
    store
        .set_token(Role::Rider, &common::make_token(-3600))
        .await
        .unwrap();

    let session = RiderSession::new(api, store.clone());
    session.restore().await.unwrap();

    assert_eq!(session.state(), SessionState::SignedOut);
    profile_mock.assert_hits(0);
    // The elapsed token is discarded, not kept around
    assert!(store.token(Role::Rider).is_none());
}

#[tokio::test]
async fn test_malformed_token_presents_signed_out_without_profile_request() {
    let server = MockServer::start();
    let profile_mock = server.mock(|when, then| {
        when.method(GET).path("/users/profile");
        then.status(200).json_body(rider_profile_json());
    });

    let dir = tempfile::tempdir().unwrap();
    let (api, store) = common::test_client(&server.base_url(), &dir).await;
    store
        .set_token(Role::Rider, "definitely-not-a-jwt")
        .await
        .unwrap();

    let session = RiderSession::new(api, store.clone());
    session.restore().await.unwrap();

    assert_eq!(session.state(), SessionState::SignedOut);
    profile_mock.assert_hits(0);
    assert!(store.token(Role::Rider).is_none());
}

#[tokio::test]
async fn test_valid_token_fetches_profile_and_signs_in() {
    let server = MockServer::start();
    let token = common::make_token(3600);
    let profile_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/users/profile")
            .header("authorization", format!("Bearer {}", token));
        then.status(200).json_body(rider_profile_json());
    });

    let dir = tempfile::tempdir().unwrap();
    let (api, store) = common::test_client(&server.base_url(), &dir).await;
    store.set_token(Role::Rider, &token).await.unwrap();

    let session = RiderSession::new(api, store.clone());
    session.restore().await.unwrap();

    profile_mock.assert_hits(1);
    match session.state() {
        SessionState::SignedIn(profile) => {
            assert_eq!(profile.fullname.firstname, "Asha");
            assert_eq!(profile.email, "asha@example.com");
        }
        other => panic!("Expected SignedIn, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_token_signs_out_immediately() {
    let server = MockServer::start();
    let profile_mock = server.mock(|when, then| {
        when.method(GET).path("/users/profile");
        then.status(200).json_body(rider_profile_json());
    });

    let dir = tempfile::tempdir().unwrap();
    let (api, store) = common::test_client(&server.base_url(), &dir).await;

    let session = RiderSession::new(api, store);
    session.restore().await.unwrap();

    assert_eq!(session.state(), SessionState::SignedOut);
    profile_mock.assert_hits(0);
}
