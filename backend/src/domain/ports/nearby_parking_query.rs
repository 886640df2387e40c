//! Driving port for nearby-parking lookups.
//!
//! HTTP handlers and the live-tracking session both call this port, so a
//! handler test can substitute a mock without wiring any remote service.

use async_trait::async_trait;

use crate::domain::{Coordinate, Error, NearbyParking, SearchRadius};

/// Lookup around a known position.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyParkingRequest {
    pub origin: Coordinate,
    pub radius: SearchRadius,
    /// Case-insensitive substring applied to spot names.
    pub name_filter: Option<String>,
}

/// Lookup around a place found by free text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingSearchRequest {
    pub query: String,
    pub radius: SearchRadius,
    pub name_filter: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NearbyParkingQuery: Send + Sync {
    /// Ranked spots around the request origin.
    async fn nearby(&self, request: &NearbyParkingRequest) -> Result<NearbyParking, Error>;

    /// Geocode the query, then rank spots around the match.
    async fn search(&self, request: &ParkingSearchRequest) -> Result<NearbyParking, Error>;

    /// Display name for `position`.
    async fn describe_position(&self, position: &Coordinate) -> Result<String, Error>;
}
