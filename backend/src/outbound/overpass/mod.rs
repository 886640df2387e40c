//! Overpass outbound adapter.
//!
//! Implements the `ParkingPoiSource` port with one `around:` query per
//! lookup against a public Overpass endpoint.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_QUERY_TIMEOUT_SECONDS, OverpassHttpSource};
