//! Rider and captain profile models.

use serde::{Deserialize, Serialize};

use crate::models::{LatLng, VehicleType};

/// Name parts as the backend stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName {
    pub firstname: String,
    /// May be absent for accounts registered with a single name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
}

/// Rider profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend document id
    #[serde(rename = "_id")]
    pub id: String,
    pub fullname: FullName,
    pub email: String,
}

/// Captain availability as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptainStatus {
    Active,
    Inactive,
}

/// Captain profile, including the registered vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptainProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub fullname: FullName,
    pub email: String,
    pub status: CaptainStatus,
    pub vehicle: Vehicle,
}

/// Registered vehicle details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub color: String,
    pub plate: String,
    pub capacity: u8,
    pub vehicle_type: VehicleType,
    /// Last reported position, if the captain has pushed one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
}
