// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Captain-side ride lifecycle.
//!
//! Incoming `new-ride` events surface a pending offer (not a
//! commitment). Acceptance is the one request/response exchange on the
//! socket: the acknowledgement payload is the confirmed ride. The in-ride
//! phase (OTP start, end) runs over REST, and the server's response
//! snapshot replaces local state each time.
//!
//! Availability is a matchmaking concern only: going offline stops
//! location pushes and new offers, and never gates actions on the ride
//! already in progress.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::models::{LatLng, Ride, RideStatus, DEFAULT_CENTER};
use crate::services::location::LocationProvider;
use crate::socket::events::{names, AcceptRideRequest, LocationUpdate};
use crate::socket::SocketRelay;

struct Inner {
    offer: Mutex<Option<Ride>>,
    current: Mutex<Option<Ride>>,
}

/// The captain page logic: availability, offers, and the active ride.
pub struct CaptainFlow {
    api: ApiClient,
    relay: Arc<SocketRelay>,
    captain_id: String,
    locator: Arc<dyn LocationProvider>,
    update_interval: Duration,
    online: Arc<AtomicBool>,
    inner: Arc<Inner>,
    location_task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl CaptainFlow {
    pub fn new(
        api: ApiClient,
        relay: Arc<SocketRelay>,
        captain_id: impl Into<String>,
        locator: Arc<dyn LocationProvider>,
        update_interval: Duration,
    ) -> Self {
        Self {
            api,
            relay,
            captain_id: captain_id.into(),
            locator,
            update_interval,
            online: Arc::new(AtomicBool::new(false)),
            inner: Arc::new(Inner {
                offer: Mutex::new(None),
                current: Mutex::new(None),
            }),
            location_task: Mutex::new(None),
        }
    }

    /// Register this flow's handlers on the relay.
    pub fn subscribe(&self) {
        self.relay.on(names::NEW_RIDE, {
            let inner = Arc::clone(&self.inner);
            move |data| match serde_json::from_value::<Ride>(data) {
                Ok(ride) => inner.apply_new_ride(ride),
                Err(err) => tracing::warn!(error = %err, "Bad new-ride payload"),
            }
        });
        self.relay.on(names::RIDE_CANCELLED, {
            let inner = Arc::clone(&self.inner);
            move |data| Inner::dispatch_cancelled(&inner, data)
        });
    }

    /// Remove this flow's handlers from the relay.
    pub fn unsubscribe(&self) {
        self.relay.off(names::NEW_RIDE);
        self.relay.off(names::RIDE_CANCELLED);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    pub fn offer(&self) -> Option<Ride> {
        self.inner.offer.lock().expect("captain lock poisoned").clone()
    }

    pub fn current_ride(&self) -> Option<Ride> {
        self.inner.current.lock().expect("captain lock poisoned").clone()
    }

    /// Toggle availability. Going online starts the periodic location
    /// push; going offline stops it. The current ride is untouched either
    /// way.
    pub async fn set_online(&self, online: bool) -> Result<()> {
        if self.online.load(Ordering::SeqCst) == online {
            return Ok(());
        }

        let response = self.api.toggle_availability().await?;
        self.online.store(online, Ordering::SeqCst);

        if online {
            self.start_location_updates();
        } else {
            self.stop_location_updates();
        }

        tracing::info!(online, status = ?response.status, "Availability toggled");
        Ok(())
    }

    /// Commit to the pending offer. The acknowledgement payload is the
    /// now-confirmed ride; on any failure the offer stays pending.
    pub async fn accept_offer(&self) -> Result<Ride> {
        let offer = self
            .offer()
            .ok_or_else(|| ClientError::BadRequest("no pending ride request".to_string()))?;

        let ack = self
            .relay
            .emit_with_ack(
                names::ACCEPT_RIDE_REQUEST,
                &AcceptRideRequest {
                    ride_id: offer.id.clone(),
                    captain_id: self.captain_id.clone(),
                },
            )
            .await?;

        let ride: Ride = serde_json::from_value(ack)
            .map_err(|e| ClientError::Socket(format!("bad acceptance payload: {}", e)))?;

        *self.inner.current.lock().expect("captain lock poisoned") = Some(ride.clone());
        *self.inner.offer.lock().expect("captain lock poisoned") = None;

        tracing::info!(ride_id = %ride.id, "Ride accepted");
        Ok(ride)
    }

    /// Decline the pending offer. Local only; the server will route the
    /// request elsewhere on its own timeout.
    pub fn decline_offer(&self) {
        *self.inner.offer.lock().expect("captain lock poisoned") = None;
    }

    /// Start the accepted ride with the rider's OTP.
    pub async fn start_ride(&self, otp: &str) -> Result<Ride> {
        let ride_id = self
            .current_ride()
            .filter(|ride| ride.status == RideStatus::Accepted)
            .map(|ride| ride.id)
            .ok_or_else(|| ClientError::BadRequest("no accepted ride to start".to_string()))?;

        let ride = self.api.start_ride(&ride_id, otp).await?;
        *self.inner.current.lock().expect("captain lock poisoned") = Some(ride.clone());

        tracing::info!(ride_id = %ride.id, "Ride started");
        Ok(ride)
    }

    /// Complete the ongoing ride. Allowed regardless of availability.
    pub async fn end_ride(&self) -> Result<Ride> {
        let ride_id = self
            .current_ride()
            .filter(|ride| ride.status == RideStatus::Ongoing)
            .map(|ride| ride.id)
            .ok_or_else(|| ClientError::BadRequest("no ongoing ride to end".to_string()))?;

        let completed = self.api.end_ride(&ride_id).await?;
        *self.inner.current.lock().expect("captain lock poisoned") = None;

        tracing::info!(ride_id = %ride_id, fare = completed.fare, "Ride completed");
        Ok(completed)
    }

    // Event application, also callable directly by tests.

    pub fn handle_new_ride(&self, ride: Ride) {
        self.inner.apply_new_ride(ride);
    }

    pub fn handle_ride_cancelled(&self, ride: Ride) {
        self.inner.apply_cancelled(ride);
    }

    fn start_location_updates(&self) {
        let mut task = self.location_task.lock().expect("captain lock poisoned");
        if task.is_some() {
            return;
        }

        let relay = Arc::clone(&self.relay);
        let locator = Arc::clone(&self.locator);
        let captain_id = self.captain_id.clone();
        let interval = self.update_interval;

        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let location = resolve_location(locator.as_ref());
                relay
                    .emit(
                        names::UPDATE_LOCATION_CAPTAIN,
                        &LocationUpdate {
                            user_id: captain_id.clone(),
                            location,
                        },
                    )
                    .await;
            }
        }));
    }

    fn stop_location_updates(&self) {
        if let Some(task) = self
            .location_task
            .lock()
            .expect("captain lock poisoned")
            .take()
        {
            task.abort();
        }
    }
}

impl Drop for CaptainFlow {
    fn drop(&mut self) {
        self.stop_location_updates();
    }
}

/// Geolocation failures degrade to the default map center.
fn resolve_location(locator: &dyn LocationProvider) -> LatLng {
    match locator.current_location() {
        Ok(location) if location.is_valid() => location,
        Ok(location) => {
            tracing::warn!(?location, "Invalid geolocation, using default center");
            DEFAULT_CENTER
        }
        Err(err) => {
            tracing::warn!(error = %err, "Geolocation failed, using default center");
            DEFAULT_CENTER
        }
    }
}

impl Inner {
    fn dispatch_cancelled(inner: &Arc<Inner>, data: Value) {
        match serde_json::from_value::<Ride>(data) {
            Ok(ride) => inner.apply_cancelled(ride),
            Err(err) => tracing::warn!(error = %err, "Bad ride-cancelled payload"),
        }
    }

    fn apply_new_ride(&self, ride: Ride) {
        tracing::info!(ride_id = %ride.id, pickup = %ride.pickup, "New ride request");
        *self.offer.lock().expect("captain lock poisoned") = Some(ride);
    }

    /// Clears a pending offer or the active ride naming this ride id.
    /// Applying the same cancellation twice is a no-op.
    fn apply_cancelled(&self, ride: Ride) {
        {
            let mut offer = self.offer.lock().expect("captain lock poisoned");
            if offer.as_ref().is_some_and(|o| o.id == ride.id) {
                tracing::info!(ride_id = %ride.id, "Pending request cancelled by rider");
                *offer = None;
            }
        }
        {
            let mut current = self.current.lock().expect("captain lock poisoned");
            if current.as_ref().is_some_and(|c| c.id == ride.id) {
                tracing::info!(ride_id = %ride.id, "Active ride cancelled by rider");
                *current = None;
            }
        }
    }
}
