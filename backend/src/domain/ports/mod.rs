//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`ParkingPoiSource`, `Geocoder`, `AuthProvider`, the
//! repositories) are implemented by outbound adapters. Driving ports
//! (`NearbyParkingQuery`, `AccountCommand`, `ParkingRecordsCommand`) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod auth_provider;
mod geocoder;
mod nearby_parking_query;
mod parking_poi_source;
mod parking_records_command;
mod parking_records_repository;
mod user_profile_repository;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
#[cfg(test)]
pub use auth_provider::MockAuthProvider;
pub use auth_provider::{AuthProvider, AuthProviderError, FixtureAuthProvider};
#[cfg(test)]
pub use geocoder::MockGeocoder;
pub use geocoder::{Geocoder, GeocoderError};
#[cfg(test)]
pub use nearby_parking_query::MockNearbyParkingQuery;
pub use nearby_parking_query::{NearbyParkingQuery, NearbyParkingRequest, ParkingSearchRequest};
#[cfg(test)]
pub use parking_poi_source::MockParkingPoiSource;
pub use parking_poi_source::{ParkingPoiQuery, ParkingPoiSource, ParkingPoiSourceError};
#[cfg(test)]
pub use parking_records_command::MockParkingRecordsCommand;
pub use parking_records_command::ParkingRecordsCommand;
#[cfg(test)]
pub use parking_records_repository::MockParkingRecordsRepository;
pub use parking_records_repository::{
    FixtureParkingRecordsRepository, ParkingRecordsRepository, ParkingRecordsRepositoryError,
};
#[cfg(test)]
pub use user_profile_repository::MockUserProfileRepository;
pub use user_profile_repository::{
    FixtureUserProfileRepository, UserProfileRepository, UserProfileRepositoryError,
};
