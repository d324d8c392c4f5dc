// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types shared across the API, socket, and session layers.

/// Error type for everything the client does.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Another role is already signed in")]
    RoleConflict,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Socket error: {0}")]
    Socket(String),

    #[error("No acknowledgement for {0}")]
    Ack(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ClientError {
    /// Classify a non-success HTTP status together with its body.
    ///
    /// 401 maps to `Unauthorized` so the refresh-retry path in the API
    /// client can key off the variant instead of re-reading the status.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ClientError::Unauthorized,
            404 => ClientError::NotFound(message),
            400 | 422 => ClientError::BadRequest(message),
            _ => ClientError::Api { status, message },
        }
    }

    /// True when the error means the current credential is no good.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Unauthorized | ClientError::InvalidToken)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
