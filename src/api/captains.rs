// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Captain account endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::users::LoginRequest;
use crate::api::ApiClient;
use crate::auth::Role;
use crate::error::{ClientError, Result};
use crate::models::{CaptainProfile, CaptainStatus, FullName, VehicleType};

/// Vehicle details supplied at captain signup.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSpec {
    #[validate(length(min = 1))]
    pub color: String,
    #[validate(length(min = 1))]
    pub plate: String,
    #[validate(range(min = 1, max = 8))]
    pub capacity: u8,
    pub vehicle_type: VehicleType,
}

/// Captain signup payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterCaptainRequest {
    pub fullname: FullName,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(nested)]
    pub vehicle: VehicleSpec,
}

/// Login/register response for the captain role.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptainAuthResponse {
    pub token: String,
    pub captain: CaptainProfile,
}

/// Profile endpoint wraps the captain in an envelope object.
#[derive(Debug, Clone, Deserialize)]
struct CaptainProfileResponse {
    captain: CaptainProfile,
}

/// Availability toggle response.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityResponse {
    pub status: CaptainStatus,
}

impl ApiClient {
    /// `POST /captains/login`
    pub async fn login_captain(&self, request: &LoginRequest) -> Result<CaptainAuthResponse> {
        request
            .validate()
            .map_err(|e| ClientError::BadRequest(e.to_string()))?;
        self.post_public("/captains/login", request).await
    }

    /// `POST /captains/register`
    pub async fn register_captain(
        &self,
        request: &RegisterCaptainRequest,
    ) -> Result<CaptainAuthResponse> {
        request
            .validate()
            .map_err(|e| ClientError::BadRequest(e.to_string()))?;
        self.post_public("/captains/register", request).await
    }

    /// `GET /captains/profile`
    pub async fn captain_profile(&self) -> Result<CaptainProfile> {
        let response: CaptainProfileResponse =
            self.get_authed(Role::Captain, "/captains/profile").await?;
        Ok(response.captain)
    }

    /// `POST /captains/logout`
    pub async fn logout_captain(&self) -> Result<()> {
        self.post_authed_no_content(Role::Captain, "/captains/logout")
            .await
    }

    /// `POST /captains/toggle-availability`
    pub async fn toggle_availability(&self) -> Result<AvailabilityResponse> {
        let empty = serde_json::json!({});
        self.post_authed(Role::Captain, "/captains/toggle-availability", &empty)
            .await
    }
}
