// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - the rider and captain page logic, minus rendering.

pub mod captain;
pub mod location;
pub mod rider;

pub use captain::CaptainFlow;
pub use location::{LocationProvider, StaticLocation};
pub use rider::{RideProgress, RiderFlow};
