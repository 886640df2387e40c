//! Shared validation helpers for inbound adapters.
//!
//! Domain constructors report what is wrong; these helpers turn that into an
//! `invalid_request` error whose details name the client field and a stable
//! code, e.g. `{"field": "radiusMeters", "code": "out_of_range"}`.

use serde_json::json;

use crate::domain::{
    Coordinate, CoordinateValidationError, CredentialValidationError, Error,
    ParkingValidationError, SearchRadius,
};

/// Validation error codes for request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldErrorCode {
    OutOfRange,
    EmptyValue,
    TooLong,
}

impl FieldErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::OutOfRange => "out_of_range",
            Self::EmptyValue => "empty_value",
            Self::TooLong => "too_long",
        }
    }
}

/// Client-facing field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) const RADIUS_FIELD: FieldName = FieldName::new("radiusMeters");
pub(crate) const PARKING_ID_FIELD: FieldName = FieldName::new("parkingId");
pub(crate) const NAME_FIELD: FieldName = FieldName::new("name");

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn coordinate_error(error: &CoordinateValidationError) -> Error {
    field_error(error.field(), FieldErrorCode::OutOfRange.as_str(), error.to_string())
}

pub(crate) fn credential_error(error: &CredentialValidationError) -> Error {
    field_error(error.field(), error.code(), error.to_string())
}

/// Map a parking rule violation onto the field the client sent.
pub(crate) fn parking_error(error: &ParkingValidationError) -> Error {
    let (field, code) = match error {
        ParkingValidationError::EmptyId => (PARKING_ID_FIELD, FieldErrorCode::EmptyValue),
        ParkingValidationError::IdTooLong { .. } => (PARKING_ID_FIELD, FieldErrorCode::TooLong),
        ParkingValidationError::EmptyName => (NAME_FIELD, FieldErrorCode::EmptyValue),
        ParkingValidationError::InvalidDistance { .. }
        | ParkingValidationError::RadiusOutOfRange { .. } => (RADIUS_FIELD, FieldErrorCode::OutOfRange),
    };
    field_error(field.as_str(), code.as_str(), error.to_string())
}

pub(crate) fn parse_coordinate(latitude: f64, longitude: f64) -> Result<Coordinate, Error> {
    Coordinate::new(latitude, longitude).map_err(|err| coordinate_error(&err))
}

pub(crate) fn parse_radius(meters: Option<f64>) -> Result<SearchRadius, Error> {
    SearchRadius::from_optional(meters).map_err(|err| parking_error(&err))
}

/// Trim an optional filter, treating blank input as absent.
pub(crate) fn normalise_filter(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
