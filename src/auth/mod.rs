// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication: roles, local token inspection, per-role sessions.

pub mod claims;
pub mod session;

pub use claims::Claims;
pub use session::{CaptainSession, RiderSession, SessionManager, SessionState};

/// The two participant roles on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Rider,
    Captain,
}

impl Role {
    /// REST path prefix for this role's auth endpoints.
    pub fn api_prefix(self) -> &'static str {
        match self {
            Role::Rider => "users",
            Role::Captain => "captains",
        }
    }

    /// Participant type string used by the socket `join` event.
    pub fn user_type(self) -> &'static str {
        match self {
            Role::Rider => "user",
            Role::Captain => "captain",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.user_type())
    }
}
