//! Short-term vehicle rental endpoint.

use serde::Deserialize;
use validator::Validate;

use crate::api::ApiClient;
use crate::auth::Role;
use crate::error::{ClientError, Result};
use crate::models::RentalRequest;

/// Rental submission outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct RentalResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiClient {
    /// `POST /rentals/create`
    pub async fn create_rental(&self, request: &RentalRequest) -> Result<RentalResponse> {
        request
            .validate()
            .map_err(|e| ClientError::BadRequest(e.to_string()))?;
        self.post_authed(Role::Rider, "/rentals/create", request)
            .await
    }
}
