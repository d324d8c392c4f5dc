// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ride endpoints: fare quoting and the in-ride phase.
//!
//! Matchmaking (request/accept/cancel) runs over the socket channel; the
//! OTP-gated start and the end settlement stay on REST.

use serde::Serialize;

use crate::api::ApiClient;
use crate::auth::Role;
use crate::error::Result;
use crate::models::{FareEstimate, Ride};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartRideRequest<'a> {
    ride_id: &'a str,
    otp: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EndRideRequest<'a> {
    ride_id: &'a str,
}

impl ApiClient {
    /// `GET /rides/get-fare?pickup=&destination=`
    pub async fn fare_estimate(&self, pickup: &str, destination: &str) -> Result<FareEstimate> {
        let path = format!(
            "/rides/get-fare?pickup={}&destination={}",
            urlencoding::encode(pickup),
            urlencoding::encode(destination)
        );
        self.get_authed(Role::Rider, &path).await
    }

    /// `POST /rides/start-ride` — captain starts an accepted ride with the
    /// rider's OTP. The response is the authoritative ride snapshot.
    pub async fn start_ride(&self, ride_id: &str, otp: &str) -> Result<Ride> {
        self.post_authed(
            Role::Captain,
            "/rides/start-ride",
            &StartRideRequest { ride_id, otp },
        )
        .await
    }

    /// `POST /rides/end-ride` — captain completes the ongoing ride.
    pub async fn end_ride(&self, ride_id: &str) -> Result<Ride> {
        self.post_authed(Role::Captain, "/rides/end-ride", &EndRideRequest { ride_id })
            .await
    }
}
