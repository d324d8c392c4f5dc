// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models mirrored from the backend.
//!
//! Every entity here is server-owned; the client holds ephemeral copies
//! that are replaced wholesale when the server reports fresh state.

pub mod location;
pub mod rental;
pub mod ride;
pub mod user;

pub use location::{LatLng, Marker, MarkerRole, DEFAULT_CENTER};
pub use rental::RentalRequest;
pub use ride::{FareEstimate, Ride, RideDraft, RideStatus, VehicleType};
pub use user::{CaptainProfile, CaptainStatus, FullName, UserProfile, Vehicle};
