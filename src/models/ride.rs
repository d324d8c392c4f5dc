// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ride entities and the pre-acceptance request draft.

use serde::{Deserialize, Serialize};

use crate::models::{CaptainProfile, UserProfile};

/// Vehicle classes offered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Moto,
    Auto,
    Car,
}

/// Server-side ride status progression.
///
/// `Pending → Accepted → Ongoing → {Completed | Cancelled}`. The client
/// never advances this on its own; it mirrors whatever the server last
/// reported for a given ride id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Pending,
    Accepted,
    Ongoing,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }
}

/// A ride as the server reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    #[serde(rename = "_id")]
    pub id: String,
    pub pickup: String,
    pub destination: String,
    pub fare: f64,
    pub vehicle_type: VehicleType,
    pub status: RideStatus,
    /// One-time code the rider shares with the captain to start the ride.
    /// Only present on the rider's copy while the ride is accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captain: Option<CaptainProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

/// Server-computed fare per vehicle type for a pickup/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareEstimate {
    pub moto: f64,
    pub auto: f64,
    pub car: f64,
}

impl FareEstimate {
    /// The quoted amount for one vehicle type.
    pub fn amount_for(&self, vehicle_type: VehicleType) -> f64 {
        match vehicle_type {
            VehicleType::Moto => self.moto,
            VehicleType::Auto => self.auto,
            VehicleType::Car => self.car,
        }
    }
}

/// An ephemeral, client-side ride request.
///
/// This is *not* a [`Ride`]: it exists only between submission and the
/// server's confirmation event, which replaces it wholesale with the
/// persisted ride. Keeping the two as distinct types makes the
/// optimistic/confirmed distinction impossible to blur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideDraft {
    pub pickup: String,
    pub destination: String,
    pub vehicle_type: VehicleType,
    /// Quoted fare for the chosen vehicle type, from the fare estimate
    pub fare: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fare_amount_for_vehicle() {
        let estimate = FareEstimate {
            moto: 45.0,
            auto: 65.0,
            car: 120.0,
        };
        assert_eq!(estimate.amount_for(VehicleType::Car), 120.0);
        assert_eq!(estimate.amount_for(VehicleType::Moto), 45.0);
    }

    #[test]
    fn test_ride_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&RideStatus::Ongoing).unwrap(),
            "\"ongoing\""
        );
        let status: RideStatus = serde_json::from_str("\"accepted\"").unwrap();
        assert_eq!(status, RideStatus::Accepted);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(RideStatus::Completed.is_terminal());
        assert!(RideStatus::Cancelled.is_terminal());
        assert!(!RideStatus::Ongoing.is_terminal());
    }
}
