// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! At most one role may be signed in at a time.

use cabio_client::auth::{Role, SessionManager};
use cabio_client::error::ClientError;
use httpmock::prelude::*;
use serde_json::json;

mod common;

fn captain_profile_json() -> serde_json::Value {
    json!({
        "captain": {
            "_id": "c1",
            "fullname": { "firstname": "Ravi" },
            "email": "ravi@example.com",
            "status": "active",
            "vehicle": {
                "color": "black",
                "plate": "MP04AB1234",
                "capacity": 4,
                "vehicleType": "car"
            }
        }
    })
}

fn rider_profile_json() -> serde_json::Value {
    json!({
        "_id": "u1",
        "fullname": { "firstname": "Asha" },
        "email": "asha@example.com"
    })
}

#[tokio::test]
async fn test_cross_role_login_is_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/captains/profile");
        then.status(200).json_body(captain_profile_json());
    });
    let rider_profile = server.mock(|when, then| {
        when.method(GET).path("/users/profile");
        then.status(200).json_body(rider_profile_json());
    });

    let dir = tempfile::tempdir().unwrap();
    let (api, store) = common::test_client(&server.base_url(), &dir).await;
    let sessions = SessionManager::new(api, store.clone());

    sessions
        .login_captain(&common::make_token(3600))
        .await
        .unwrap();
    assert_eq!(sessions.active_role(), Some(Role::Captain));

    // The rider slot cannot activate while the captain is signed in.
    let result = sessions.login_rider(&common::make_token(3600)).await;
    assert!(matches!(result, Err(ClientError::RoleConflict)));
    rider_profile.assert_hits(0);
    assert!(store.token(Role::Rider).is_none());
}

#[tokio::test]
async fn test_restore_activates_one_role_and_keeps_the_other_token() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/users/profile");
        then.status(200).json_body(rider_profile_json());
    });
    let captain_profile = server.mock(|when, then| {
        when.method(GET).path("/captains/profile");
        then.status(200).json_body(captain_profile_json());
    });

    let dir = tempfile::tempdir().unwrap();
    let (api, store) = common::test_client(&server.base_url(), &dir).await;

    // Both slots hold valid tokens from earlier sessions.
    store
        .set_token(Role::Rider, &common::make_token(3600))
        .await
        .unwrap();
    store
        .set_token(Role::Captain, &common::make_token(3600))
        .await
        .unwrap();

    let sessions = SessionManager::new(api, store.clone());
    sessions.restore_all().await.unwrap();

    assert_eq!(sessions.active_role(), Some(Role::Rider));
    captain_profile.assert_hits(0);
    // The captain token is kept, just not activated.
    assert!(store.token(Role::Captain).is_some());
}
