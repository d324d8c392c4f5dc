// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rider-side ride lifecycle.
//!
//! The client-observed progression is
//! `Idle → Requested → Accepted → Ongoing → Completed` with cancellation
//! dropping back to `Idle` from any non-terminal state. The rider only
//! *proposes* transitions (request, cancel); every inbound socket event
//! is authoritative for the ride id it names and replaces local state
//! wholesale. Terminal events are idempotent: re-delivery after the first
//! application changes nothing.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::models::{FareEstimate, Ride, RideDraft, VehicleType};
use crate::socket::events::{names, CancelRideRequest, CreateRideRequest};
use crate::socket::SocketRelay;

/// Client-side ride progression.
///
/// `Requested` holds the optimistic [`RideDraft`] — deliberately a
/// different type from the confirmed [`Ride`], so reconciliation on
/// `ride-confirmed` is a replacement, never a merge.
#[derive(Debug, Clone, PartialEq)]
pub enum RideProgress {
    Idle,
    Requested(RideDraft),
    Accepted(Ride),
    Ongoing(Ride),
    Completed(Ride),
}

impl RideProgress {
    /// The id of the server-confirmed ride being tracked, if any.
    pub fn tracked_ride_id(&self) -> Option<&str> {
        match self {
            RideProgress::Accepted(ride)
            | RideProgress::Ongoing(ride)
            | RideProgress::Completed(ride) => Some(&ride.id),
            _ => None,
        }
    }
}

/// A cached fare quote for one pickup/destination pair.
#[derive(Debug, Clone)]
struct RouteQuote {
    pickup: String,
    destination: String,
    estimate: FareEstimate,
}

struct Inner {
    progress: Mutex<RideProgress>,
    quote: Mutex<Option<RouteQuote>>,
}

/// The rider page logic: fare quoting, booking, and lifecycle tracking.
pub struct RiderFlow {
    api: ApiClient,
    relay: Arc<SocketRelay>,
    user_id: String,
    inner: Arc<Inner>,
}

impl RiderFlow {
    pub fn new(api: ApiClient, relay: Arc<SocketRelay>, user_id: impl Into<String>) -> Self {
        Self {
            api,
            relay,
            user_id: user_id.into(),
            inner: Arc::new(Inner {
                progress: Mutex::new(RideProgress::Idle),
                quote: Mutex::new(None),
            }),
        }
    }

    /// Register this flow's handlers on the relay.
    pub fn subscribe(&self) {
        self.relay.on(names::RIDE_CONFIRMED, {
            let inner = Arc::clone(&self.inner);
            move |data| Inner::dispatch(&inner, data, names::RIDE_CONFIRMED, Inner::apply_confirmed)
        });
        self.relay.on(names::RIDE_STARTED, {
            let inner = Arc::clone(&self.inner);
            move |data| Inner::dispatch(&inner, data, names::RIDE_STARTED, Inner::apply_started)
        });
        self.relay.on(names::RIDE_ENDED, {
            let inner = Arc::clone(&self.inner);
            move |data| Inner::dispatch(&inner, data, names::RIDE_ENDED, Inner::apply_ended)
        });
        self.relay.on(names::RIDE_CANCELLED, {
            let inner = Arc::clone(&self.inner);
            move |data| Inner::dispatch(&inner, data, names::RIDE_CANCELLED, Inner::apply_cancelled)
        });
    }

    /// Remove this flow's handlers from the relay.
    pub fn unsubscribe(&self) {
        self.relay.off(names::RIDE_CONFIRMED);
        self.relay.off(names::RIDE_STARTED);
        self.relay.off(names::RIDE_ENDED);
        self.relay.off(names::RIDE_CANCELLED);
    }

    pub fn progress(&self) -> RideProgress {
        self.inner.progress.lock().expect("rider lock poisoned").clone()
    }

    /// Fetch and cache the fare quote for a route.
    pub async fn fetch_fare(&self, pickup: &str, destination: &str) -> Result<FareEstimate> {
        let estimate = self.api.fare_estimate(pickup, destination).await?;
        *self.inner.quote.lock().expect("rider lock poisoned") = Some(RouteQuote {
            pickup: pickup.to_string(),
            destination: destination.to_string(),
            estimate,
        });
        Ok(estimate)
    }

    /// Submit a ride request for a previously quoted route.
    ///
    /// Transitions to `Requested` optimistically, before any server
    /// acknowledgement; `ride-confirmed` replaces the draft with the
    /// persisted ride.
    pub async fn request_ride(
        &self,
        pickup: &str,
        destination: &str,
        vehicle_type: VehicleType,
    ) -> Result<RideDraft> {
        let fare = {
            let quote = self.inner.quote.lock().expect("rider lock poisoned");
            match quote.as_ref() {
                Some(q) if q.pickup == pickup && q.destination == destination => {
                    q.estimate.amount_for(vehicle_type)
                }
                _ => {
                    return Err(ClientError::BadRequest(
                        "no fare estimate for this route".to_string(),
                    ))
                }
            }
        };

        let draft = RideDraft {
            pickup: pickup.to_string(),
            destination: destination.to_string(),
            vehicle_type,
            fare,
        };

        {
            let mut progress = self.inner.progress.lock().expect("rider lock poisoned");
            if !matches!(*progress, RideProgress::Idle) {
                return Err(ClientError::BadRequest(
                    "a ride is already in progress".to_string(),
                ));
            }
            *progress = RideProgress::Requested(draft.clone());
        }

        self.relay
            .emit(
                names::CREATE_RIDE_REQUEST,
                &CreateRideRequest {
                    user_id: self.user_id.clone(),
                    pickup: draft.pickup.clone(),
                    destination: draft.destination.clone(),
                    vehicle_type: draft.vehicle_type,
                    fare: draft.fare,
                },
            )
            .await;

        tracing::info!(pickup, destination, fare, "Ride requested");
        Ok(draft)
    }

    /// Abandon the requested or accepted ride.
    pub async fn cancel_ride(&self) -> Result<()> {
        let ride_id = {
            let mut progress = self.inner.progress.lock().expect("rider lock poisoned");
            let ride_id = match &*progress {
                RideProgress::Requested(_) => None,
                RideProgress::Accepted(ride) => Some(ride.id.clone()),
                _ => {
                    return Err(ClientError::BadRequest(
                        "no cancellable ride".to_string(),
                    ))
                }
            };
            *progress = RideProgress::Idle;
            ride_id
        };

        self.relay
            .emit(
                names::CANCEL_RIDE_REQUEST,
                &CancelRideRequest {
                    ride_id: ride_id.clone(),
                    user_id: self.user_id.clone(),
                },
            )
            .await;

        tracing::info!(?ride_id, "Ride cancelled by rider");
        Ok(())
    }

    /// Reset a completed ride back to idle (the UI's post-ride reset).
    pub fn clear_completed(&self) {
        let mut progress = self.inner.progress.lock().expect("rider lock poisoned");
        if matches!(*progress, RideProgress::Completed(_)) {
            *progress = RideProgress::Idle;
        }
    }

    // Event application, also callable directly by tests.

    pub fn handle_ride_confirmed(&self, ride: Ride) {
        self.inner.apply_confirmed(ride);
    }

    pub fn handle_ride_started(&self, ride: Ride) {
        self.inner.apply_started(ride);
    }

    pub fn handle_ride_ended(&self, ride: Ride) {
        self.inner.apply_ended(ride);
    }

    pub fn handle_ride_cancelled(&self, ride: Ride) {
        self.inner.apply_cancelled(ride);
    }
}

impl Inner {
    fn dispatch(inner: &Arc<Inner>, data: Value, event: &str, apply: fn(&Inner, Ride)) {
        match serde_json::from_value::<Ride>(data) {
            Ok(ride) => apply(inner, ride),
            Err(err) => tracing::warn!(event, error = %err, "Bad ride payload"),
        }
    }

    fn apply_confirmed(&self, ride: Ride) {
        let mut progress = self.progress.lock().expect("rider lock poisoned");
        match &*progress {
            RideProgress::Completed(current) if current.id == ride.id => return,
            RideProgress::Accepted(current) | RideProgress::Ongoing(current)
                if current.id != ride.id =>
            {
                tracing::warn!(tracked = %current.id, event_ride = %ride.id, "ride-confirmed names a different ride, ignoring");
                return;
            }
            _ => {}
        }
        tracing::info!(ride_id = %ride.id, "Ride confirmed");
        *progress = RideProgress::Accepted(ride);
    }

    fn apply_started(&self, ride: Ride) {
        let mut progress = self.progress.lock().expect("rider lock poisoned");
        if let Some(tracked) = progress.tracked_ride_id() {
            if tracked != ride.id {
                tracing::warn!(tracked, event_ride = %ride.id, "ride-started names a different ride, ignoring");
                return;
            }
        }
        if matches!(&*progress, RideProgress::Completed(_)) {
            return;
        }
        tracing::info!(ride_id = %ride.id, "Ride started");
        *progress = RideProgress::Ongoing(ride);
    }

    fn apply_ended(&self, ride: Ride) {
        let mut progress = self.progress.lock().expect("rider lock poisoned");
        match &*progress {
            RideProgress::Accepted(current) | RideProgress::Ongoing(current)
                if current.id == ride.id =>
            {
                tracing::info!(ride_id = %ride.id, fare = ride.fare, "Ride completed");
                *progress = RideProgress::Completed(ride);
            }
            // Untracked ride id, or already completed: no-op.
            _ => {}
        }
    }

    fn apply_cancelled(&self, ride: Ride) {
        let mut progress = self.progress.lock().expect("rider lock poisoned");
        let applies = match &*progress {
            RideProgress::Requested(_) => true,
            RideProgress::Accepted(current) | RideProgress::Ongoing(current) => {
                current.id == ride.id
            }
            RideProgress::Idle | RideProgress::Completed(_) => false,
        };
        if applies {
            tracing::info!(ride_id = %ride.id, "Ride cancelled");
            *progress = RideProgress::Idle;
        }
    }
}
