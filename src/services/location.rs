// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geolocation source abstraction.
//!
//! The embedding application supplies the real position source; this
//! crate only needs "where is the device right now". Failures degrade to
//! [`DEFAULT_CENTER`](crate::models::DEFAULT_CENTER) at the call sites.

use crate::error::Result;
use crate::models::LatLng;

/// Source of the device's current position.
pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> Result<LatLng>;
}

/// A fixed position. Useful for headless runs and tests.
pub struct StaticLocation(pub LatLng);

impl LocationProvider for StaticLocation {
    fn current_location(&self) -> Result<LatLng> {
        Ok(self.0)
    }
}
