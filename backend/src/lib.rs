//! Spark backend: nearby-parking lookup, accounts and live tracking.
//!
//! The crate follows a hexagonal layout. [`domain`] holds the rules and the
//! ports, [`outbound`] the adapters for Overpass, Nominatim and Supabase, and
//! [`inbound`] the actix-web HTTP and WebSocket surfaces.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
