// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local bearer-token inspection.
//!
//! The client never holds the backend's signing key, so tokens are decoded
//! with signature validation disabled: the only question answered locally
//! is "has this token's embedded expiry elapsed". Authenticity is the
//! server's problem; expiry gating is ours.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (backend account id)
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: usize,
}

impl Claims {
    /// Whether the token had already expired at `now`.
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        (self.exp as i64) <= now.timestamp()
    }
}

/// Decode a token's claims without verifying the signature.
///
/// Expiry is deliberately not validated here; callers check
/// [`Claims::expired_at`] so an elapsed token can be discarded rather than
/// surfaced as a decode error.
pub fn decode_unverified(token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|_| ClientError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(exp_offset_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Some("abc123".to_string()),
            exp: (now + exp_offset_secs) as usize,
            iat: now as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"some-signing-key-we-do-not-know"),
        )
        .expect("Failed to create token")
    }

    #[test]
    fn test_decode_without_signing_key() {
        let claims = decode_unverified(&make_token(3600)).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("abc123"));
        assert!(!claims.expired_at(Utc::now()));
    }

    #[test]
    fn test_elapsed_token_reports_expired() {
        let claims = decode_unverified(&make_token(-60)).unwrap();
        assert!(claims.expired_at(Utc::now()));
    }

    #[test]
    fn test_garbage_is_invalid_token() {
        assert!(matches!(
            decode_unverified("not.a.token"),
            Err(ClientError::InvalidToken)
        ));
        assert!(matches!(
            decode_unverified(""),
            Err(ClientError::InvalidToken)
        ));
    }
}
