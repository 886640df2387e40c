//! Domain primitives, ports and services.
//!
//! Purpose: hold the parking, geography and account rules independent of
//! HTTP, WebSocket and the remote services. Types validate on construction
//! and document their invariants in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Coordinate, distance_meters, estimated_minutes: geography.
//! - ParkingSpot, SearchRadius, rank_nearby: nearby-parking ranking.
//! - EmailAddress, NewPassword, LoginCredentials, SignUpDetails: credentials.
//! - LocationUpdateFilter, RefreshTracker: live-tracking state.
//! - Services implementing the driving ports in [`ports`].

pub mod account_service;
pub mod auth;
pub mod error;
pub mod geo;
pub mod nearby_parking_service;
pub mod parking;
pub mod parking_records;
pub mod parking_records_service;
pub mod ports;
pub mod tracking;
mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    CredentialValidationError, EmailAddress, FullName, LoginCredentials, NewPassword,
    SignUpDetails, meets_password_policy,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::geo::{
    Coordinate, CoordinateValidationError, GeocodedPlace, WALKING_SPEED_MPS, distance_meters,
    estimated_minutes, estimated_minutes_at,
};
pub use self::nearby_parking_service::NearbyParkingService;
pub use self::parking::{
    DEFAULT_SEARCH_RADIUS_M, MAX_NEARBY_RESULTS, MAX_SEARCH_RADIUS_M, NearbyParking, ParkingPoi,
    ParkingSpot, ParkingSpotId, ParkingValidationError, SearchRadius, filter_by_name,
    parking_display_name, rank_nearby, select_nearby,
};
pub use self::parking_records::{ParkingHistoryEntry, ParkingSpotRecord, SavedParkingSpot};
pub use self::parking_records_service::ParkingRecordsService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::tracking::{
    LocationUpdateFilter, MIN_LOCATION_DELTA_M, RefreshOutcome, RefreshTicket, RefreshTracker,
};
pub use self::user::{
    AccessToken, AuthSession, UserId, UserProfile, UserSession, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use spark_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("login required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
