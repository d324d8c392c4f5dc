// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! REST API layer: the refreshing HTTP client and typed endpoint wrappers.

pub mod captains;
pub mod client;
pub mod rentals;
pub mod rides;
pub mod users;

pub use captains::{AvailabilityResponse, CaptainAuthResponse, RegisterCaptainRequest, VehicleSpec};
pub use client::ApiClient;
pub use rentals::RentalResponse;
pub use users::{LoginRequest, RegisterUserRequest, UserAuthResponse};
