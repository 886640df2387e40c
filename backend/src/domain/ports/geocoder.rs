//! Driven port for forward and reverse geocoding.

use async_trait::async_trait;

use crate::domain::{Coordinate, GeocodedPlace};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the geocoder.
    pub enum GeocoderError {
        Transport { message: String } => "geocoder transport failed: {message}",
        Timeout { message: String } => "geocoder timed out: {message}",
        RateLimited { message: String } => "geocoder rate limited: {message}",
        Decode { message: String } => "geocoder response decode failed: {message}",
        InvalidRequest { message: String } => "geocoder request invalid: {message}",
    }
}

/// Port resolving text to places and positions to names.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for free text, or `None` when nothing matched.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedPlace>, GeocoderError>;

    /// Display name of the place at `position`, or `None` when unknown.
    async fn reverse(&self, position: &Coordinate) -> Result<Option<String>, GeocoderError>;
}
