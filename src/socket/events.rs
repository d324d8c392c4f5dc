// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The canonical socket event contract.
//!
//! One name per event, in both directions. Server-to-client lifecycle
//! events carry the full authoritative [`Ride`](crate::models::Ride)
//! snapshot for the ride they name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{LatLng, VehicleType};

/// Event names as constants.
pub mod names {
    // client → server
    pub const JOIN: &str = "join";
    pub const UPDATE_LOCATION_CAPTAIN: &str = "update-location-captain";
    pub const CREATE_RIDE_REQUEST: &str = "create-ride-request";
    pub const ACCEPT_RIDE_REQUEST: &str = "accept-ride-request";
    pub const CANCEL_RIDE_REQUEST: &str = "cancel-ride-request";

    // server → client
    pub const NEW_RIDE: &str = "new-ride";
    pub const RIDE_CONFIRMED: &str = "ride-confirmed";
    pub const RIDE_STARTED: &str = "ride-started";
    pub const RIDE_ENDED: &str = "ride-ended";
    pub const RIDE_CANCELLED: &str = "ride-cancelled";
}

/// Wire envelope for every socket message, both directions.
///
/// `ack` on an outbound message asks the server to answer with an
/// envelope carrying the same id; on an inbound message it marks that
/// answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<u64>,
}

/// `join`: announce this connection's identity and role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub user_id: String,
    pub user_type: String,
}

/// `update-location-captain`: periodic captain position push.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub user_id: String,
    pub location: LatLng,
}

/// `create-ride-request`: the rider's pre-acceptance draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRideRequest {
    pub user_id: String,
    pub pickup: String,
    pub destination: String,
    pub vehicle_type: VehicleType,
    pub fare: f64,
}

/// `accept-ride-request`: captain commits to a pending offer.
/// Acknowledged with the confirmed ride.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptRideRequest {
    pub ride_id: String,
    pub captain_id: String,
}

/// `cancel-ride-request`: either side abandons a requested or accepted
/// ride. `ride_id` is absent while the rider's draft is still
/// unconfirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRideRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ride_id: Option<String>,
    pub user_id: String,
}
