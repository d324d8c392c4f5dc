// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rider account endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::ApiClient;
use crate::auth::Role;
use crate::error::{ClientError, Result};
use crate::models::{FullName, UserProfile};

/// Credentials for either role's login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Rider signup payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    pub fullname: FullName,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Login/register response: the issued token plus the account it names.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAuthResponse {
    pub token: String,
    pub user: UserProfile,
}

impl ApiClient {
    /// `POST /users/login`
    pub async fn login_user(&self, request: &LoginRequest) -> Result<UserAuthResponse> {
        request
            .validate()
            .map_err(|e| ClientError::BadRequest(e.to_string()))?;
        self.post_public("/users/login", request).await
    }

    /// `POST /users/register`
    pub async fn register_user(&self, request: &RegisterUserRequest) -> Result<UserAuthResponse> {
        request
            .validate()
            .map_err(|e| ClientError::BadRequest(e.to_string()))?;
        self.post_public("/users/register", request).await
    }

    /// `GET /users/profile`
    pub async fn user_profile(&self) -> Result<UserProfile> {
        self.get_authed(Role::Rider, "/users/profile").await
    }

    /// `POST /users/logout`
    pub async fn logout_user(&self) -> Result<()> {
        self.post_authed_no_content(Role::Rider, "/users/logout")
            .await
    }
}
