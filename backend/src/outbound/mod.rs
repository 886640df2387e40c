//! Outbound adapters implementing domain ports for remote services.
//!
//! - **overpass**: parking POIs from the Overpass API
//! - **nominatim**: forward and reverse geocoding
//! - **supabase**: hosted auth plus the profile and parking tables
//!
//! Adapters translate between domain types and wire formats. They contain no
//! business logic.

pub mod http_support;
pub mod nominatim;
pub mod overpass;
pub mod supabase;

pub use http_support::HttpIdentity;
