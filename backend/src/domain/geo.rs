//! Geographic primitives: validated coordinates, haversine distance and
//! walking-time estimates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Assumed walking speed for ETA estimates, in metres per second.
pub const WALKING_SPEED_MPS: f64 = 5.0;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Validation errors returned by [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateValidationError {
    /// Latitude was NaN, infinite, or outside `[-90, 90]`.
    LatitudeOutOfRange { value: f64 },
    /// Longitude was NaN, infinite, or outside `[-180, 180]`.
    LongitudeOutOfRange { value: f64 },
}

impl CoordinateValidationError {
    /// Name of the offending field in client payloads.
    pub fn field(&self) -> &'static str {
        match self {
            Self::LatitudeOutOfRange { .. } => "latitude",
            Self::LongitudeOutOfRange { .. } => "longitude",
        }
    }
}

impl fmt::Display for CoordinateValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude must be within [-90, 90], got {value}")
            }
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude must be within [-180, 180], got {value}")
            }
        }
    }
}

impl std::error::Error for CoordinateValidationError {}

/// WGS84 position in degrees.
///
/// ## Invariants
/// - `latitude` is finite and within `[-90, 90]`.
/// - `longitude` is finite and within `[-180, 180]`.
///
/// # Examples
/// ```
/// use spark_backend::domain::Coordinate;
///
/// let manila = Coordinate::new(14.5995, 120.9842).unwrap();
/// assert_eq!(manila.latitude(), 14.5995);
/// assert!(Coordinate::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinateDto", into = "CoordinateDto")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Validate and construct a coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateValidationError::LatitudeOutOfRange { value: latitude });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateValidationError::LongitudeOutOfRange { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_meters(self, other)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoordinateDto {
    latitude: f64,
    longitude: f64,
}

impl From<Coordinate> for CoordinateDto {
    fn from(value: Coordinate) -> Self {
        Self {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

impl TryFrom<CoordinateDto> for Coordinate {
    type Error = CoordinateValidationError;

    fn try_from(value: CoordinateDto) -> Result<Self, Self::Error> {
        Self::new(value.latitude, value.longitude)
    }
}

/// Place resolved by the geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    /// Human-readable label, e.g. "Robinsons Place Manila, Ermita".
    pub display_name: String,
    pub coordinate: Coordinate,
}

/// Haversine distance between two coordinates, in metres.
///
/// # Examples
/// ```
/// use spark_backend::domain::{Coordinate, distance_meters};
///
/// let a = Coordinate::new(14.5995, 120.9842).unwrap();
/// assert_eq!(distance_meters(&a, &a), 0.0);
/// ```
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Walking-time estimate in whole minutes at [`WALKING_SPEED_MPS`].
///
/// Rounds up, so any positive distance yields at least one minute.
///
/// # Examples
/// ```
/// use spark_backend::domain::estimated_minutes;
///
/// assert_eq!(estimated_minutes(0.0), 0);
/// assert_eq!(estimated_minutes(1.0), 1);
/// assert_eq!(estimated_minutes(301.0), 2);
/// ```
pub fn estimated_minutes(distance_m: f64) -> u32 {
    estimated_minutes_at(distance_m, WALKING_SPEED_MPS)
}

/// Walking-time estimate in whole minutes for an explicit speed.
///
/// Non-positive or non-finite speeds and distances produce `0`.
pub fn estimated_minutes_at(distance_m: f64, speed_mps: f64) -> u32 {
    if !distance_m.is_finite() || distance_m <= 0.0 || !speed_mps.is_finite() || speed_mps <= 0.0
    {
        return 0;
    }
    let minutes = (distance_m / speed_mps / SECONDS_PER_MINUTE).ceil();
    // Float-to-int `as` saturates at u32::MAX.
    minutes as u32
}
