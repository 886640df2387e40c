//! Nearby-parking service implementing [`NearbyParkingQuery`].
//!
//! One refresh is one POI lookup followed by the pure ranking in
//! [`crate::domain::parking`]. Nothing is cached and failures are not retried.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::parking::{filter_by_name, rank_nearby};
use crate::domain::ports::{
    Geocoder, GeocoderError, NearbyParkingQuery, NearbyParkingRequest, ParkingPoiQuery,
    ParkingPoiSource, ParkingPoiSourceError, ParkingSearchRequest,
};
use crate::domain::{Coordinate, Error, GeocodedPlace, NearbyParking, SearchRadius};

/// Message returned when free-text search finds nothing.
pub const NO_PLACE_MATCHED: &str = "no place matched the search";

/// Service ranking POI results around a position or a searched place.
pub struct NearbyParkingService<S: ?Sized, G: ?Sized> {
    source: Arc<S>,
    geocoder: Arc<G>,
}

impl<S: ?Sized, G: ?Sized> Clone for NearbyParkingService<S, G> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            geocoder: Arc::clone(&self.geocoder),
        }
    }
}

impl<S: ?Sized, G: ?Sized> NearbyParkingService<S, G> {
    pub fn new(source: Arc<S>, geocoder: Arc<G>) -> Self {
        Self { source, geocoder }
    }
}

impl<S, G> NearbyParkingService<S, G>
where
    S: ParkingPoiSource + ?Sized,
    G: Geocoder + ?Sized,
{
    fn map_source_error(error: ParkingPoiSourceError) -> Error {
        warn!(error = %error, "parking lookup failed");
        match error {
            ParkingPoiSourceError::Transport { .. }
            | ParkingPoiSourceError::Timeout { .. }
            | ParkingPoiSourceError::RateLimited { .. } => {
                Error::service_unavailable(format!("parking data unavailable: {error}"))
            }
            ParkingPoiSourceError::InvalidRequest { .. } => {
                Error::invalid_request(format!("parking lookup rejected: {error}"))
            }
            ParkingPoiSourceError::Decode { .. } => {
                Error::internal(format!("parking data malformed: {error}"))
            }
        }
    }

    fn map_geocoder_error(error: GeocoderError) -> Error {
        warn!(error = %error, "geocoder call failed");
        match error {
            GeocoderError::Transport { .. }
            | GeocoderError::Timeout { .. }
            | GeocoderError::RateLimited { .. } => {
                Error::service_unavailable(format!("place search unavailable: {error}"))
            }
            GeocoderError::InvalidRequest { .. } => {
                Error::invalid_request(format!("place search rejected: {error}"))
            }
            GeocoderError::Decode { .. } => {
                Error::internal(format!("place search response malformed: {error}"))
            }
        }
    }

    async fn refresh(
        &self,
        origin: Coordinate,
        radius: SearchRadius,
        name_filter: Option<&str>,
        place: Option<GeocodedPlace>,
    ) -> Result<NearbyParking, Error> {
        let pois = self
            .source
            .fetch_parking(&ParkingPoiQuery { origin, radius })
            .await
            .map_err(Self::map_source_error)?;
        let fetched = pois.len();
        let mut spots = rank_nearby(&origin, pois, radius);
        if let Some(needle) = name_filter {
            spots = filter_by_name(spots, needle);
        }
        debug!(fetched, kept = spots.len(), radius_m = radius.meters(), "ranked parking");
        Ok(NearbyParking {
            origin,
            radius,
            spots,
            place,
        })
    }
}

#[async_trait]
impl<S, G> NearbyParkingQuery for NearbyParkingService<S, G>
where
    S: ParkingPoiSource + ?Sized,
    G: Geocoder + ?Sized,
{
    async fn nearby(&self, request: &NearbyParkingRequest) -> Result<NearbyParking, Error> {
        self.refresh(
            request.origin,
            request.radius,
            request.name_filter.as_deref(),
            None,
        )
        .await
    }

    async fn search(&self, request: &ParkingSearchRequest) -> Result<NearbyParking, Error> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(Error::invalid_request("search query must not be empty")
                .with_details(json!({ "field": "q", "code": "empty_query" })));
        }
        let place = self
            .geocoder
            .geocode(query)
            .await
            .map_err(Self::map_geocoder_error)?
            .ok_or_else(|| Error::not_found(NO_PLACE_MATCHED))?;
        self.refresh(
            place.coordinate,
            request.radius,
            request.name_filter.as_deref(),
            Some(place),
        )
        .await
    }

    async fn describe_position(&self, position: &Coordinate) -> Result<String, Error> {
        self.geocoder
            .reverse(position)
            .await
            .map_err(Self::map_geocoder_error)?
            .ok_or_else(|| Error::not_found("no place found at this position"))
    }
}

#[cfg(test)]
#[path = "nearby_parking_service_tests.rs"]
mod tests;
