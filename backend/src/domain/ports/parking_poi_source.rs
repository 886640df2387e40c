//! Driven port for fetching parking amenities around a position.
//!
//! The domain owns the query shape; the Overpass adapter turns it into an
//! `around:` filter and maps OSM elements back into [`ParkingPoi`] values.

use async_trait::async_trait;

use crate::domain::{Coordinate, ParkingPoi, SearchRadius};

use super::define_port_error;

/// Parking lookup centred on `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParkingPoiQuery {
    pub origin: Coordinate,
    pub radius: SearchRadius,
}

define_port_error! {
    /// Errors surfaced while calling the POI service.
    pub enum ParkingPoiSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "parking lookup transport failed: {message}",
        /// The POI service did not answer in time.
        Timeout { message: String } =>
            "parking lookup timed out: {message}",
        /// The POI service rate-limited the request.
        RateLimited { message: String } =>
            "parking lookup rate limited: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "parking lookup response decode failed: {message}",
        /// The POI service rejected the query.
        InvalidRequest { message: String } =>
            "parking lookup request invalid: {message}",
    }
}

/// Port for querying parking POIs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParkingPoiSource: Send + Sync {
    /// Fetch every parking amenity around the query origin.
    ///
    /// Results are unranked and may include places outside the radius.
    async fn fetch_parking(
        &self,
        query: &ParkingPoiQuery,
    ) -> Result<Vec<ParkingPoi>, ParkingPoiSourceError>;
}
