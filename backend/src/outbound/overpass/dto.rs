//! DTOs for decoding Overpass JSON responses.
//!
//! Elements decode into these transport DTOs first and are mapped into
//! [`ParkingPoi`] values in one pass. Elements without usable coordinates are
//! skipped rather than failing the whole lookup.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Coordinate, ParkingPoi, ParkingSpotId, parking_display_name};

#[derive(Debug, Deserialize)]
pub(super) struct OverpassResponseDto {
    #[serde(default)]
    pub(super) elements: Vec<OverpassElementDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassElementDto {
    #[serde(rename = "type")]
    pub(super) element_type: String,
    pub(super) id: i64,
    pub(super) lat: Option<f64>,
    pub(super) lon: Option<f64>,
    pub(super) center: Option<OverpassCenterDto>,
    #[serde(default)]
    pub(super) tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassCenterDto {
    pub(super) lat: f64,
    pub(super) lon: f64,
}

impl OverpassResponseDto {
    pub(super) fn into_parking_pois(self) -> Vec<ParkingPoi> {
        self.elements
            .into_iter()
            .filter_map(OverpassElementDto::into_parking_poi)
            .collect()
    }
}

impl OverpassElementDto {
    fn into_parking_poi(self) -> Option<ParkingPoi> {
        let Some((latitude, longitude)) = self.position() else {
            debug!(
                element_type = %self.element_type,
                element_id = self.id,
                "skipping parking element without coordinates"
            );
            return None;
        };
        let coordinate = match Coordinate::new(latitude, longitude) {
            Ok(coordinate) => coordinate,
            Err(error) => {
                debug!(
                    element_type = %self.element_type,
                    element_id = self.id,
                    %error,
                    "skipping parking element with invalid coordinates"
                );
                return None;
            }
        };
        let name = parking_display_name(
            self.tags.get("name").map(String::as_str),
            self.tags.get("operator").map(String::as_str),
        );
        Some(ParkingPoi {
            id: ParkingSpotId::from_osm(&self.element_type, self.id),
            name,
            coordinate,
        })
    }

    fn position(&self) -> Option<(f64, f64)> {
        if let (Some(latitude), Some(longitude)) = (self.lat, self.lon) {
            return Some((latitude, longitude));
        }
        self.center.as_ref().map(|center| (center.lat, center.lon))
    }
}
