// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map viewport bookkeeping.
//!
//! Holds the center, zoom, and the marker set a renderer would draw.
//! Rendering itself is out of scope; the only rule enforced here is that
//! coordinates must be numerically valid.

use crate::error::{ClientError, Result};
use crate::models::{LatLng, Marker, MarkerRole, DEFAULT_CENTER};

/// Default zoom for the initial city-wide view.
const DEFAULT_ZOOM: u8 = 13;

/// Zoom used once a device position is known.
const FOCUSED_ZOOM: u8 = 15;

/// A map viewport: center, zoom, and one marker per role.
#[derive(Debug, Clone)]
pub struct MapView {
    center: LatLng,
    zoom: u8,
    markers: Vec<Marker>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            markers: Vec::new(),
        }
    }
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Move the viewport.
    pub fn set_view(&mut self, center: LatLng, zoom: u8) -> Result<()> {
        if !center.is_valid() {
            return Err(ClientError::BadRequest(format!(
                "invalid map center ({}, {})",
                center.lat, center.lng
            )));
        }
        self.center = center;
        self.zoom = zoom;
        Ok(())
    }

    /// Center the view on a freshly resolved device position.
    pub fn focus_on(&mut self, position: LatLng) -> Result<()> {
        self.set_view(position, FOCUSED_ZOOM)
    }

    /// Place or move the marker for a role.
    pub fn upsert_marker(&mut self, role: MarkerRole, position: LatLng) -> Result<()> {
        if !position.is_valid() {
            return Err(ClientError::BadRequest(format!(
                "invalid marker position ({}, {})",
                position.lat, position.lng
            )));
        }
        self.markers.retain(|marker| marker.role != role);
        self.markers.push(Marker { position, role });
        Ok(())
    }

    pub fn remove_marker(&mut self, role: MarkerRole) {
        self.markers.retain(|marker| marker.role != role);
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_per_role_is_replaced() {
        let mut map = MapView::new();
        map.upsert_marker(MarkerRole::Own, LatLng::new(10.0, 20.0))
            .unwrap();
        map.upsert_marker(MarkerRole::Own, LatLng::new(11.0, 21.0))
            .unwrap();
        map.upsert_marker(MarkerRole::Captain, LatLng::new(12.0, 22.0))
            .unwrap();

        assert_eq!(map.markers().len(), 2);
        let own = map
            .markers()
            .iter()
            .find(|m| m.role == MarkerRole::Own)
            .unwrap();
        assert_eq!(own.position, LatLng::new(11.0, 21.0));
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let mut map = MapView::new();
        assert!(map.set_view(LatLng::new(f64::NAN, 0.0), 13).is_err());
        assert!(map
            .upsert_marker(MarkerRole::Destination, LatLng::new(0.0, 200.0))
            .is_err());
        // Unchanged after the rejections
        assert_eq!(map.center(), DEFAULT_CENTER);
        assert!(map.markers().is_empty());
    }
}
