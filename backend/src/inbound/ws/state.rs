//! Shared WebSocket adapter state.
//!
//! The upgrade handler only depends on the nearby-parking port and an origin
//! allow-list, so tests can swap in deterministic doubles.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::NearbyParkingQuery;

/// Browser origins allowed to open a WebSocket.
///
/// Entries compare by scheme, host and port. `http://localhost` with any
/// explicit non-zero port is always allowed for local development.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    /// Parse configured origins such as `https://spark.example`.
    ///
    /// # Errors
    /// Returns the parse error of the first invalid entry.
    pub fn parse<'a>(origins: impl IntoIterator<Item = &'a str>) -> Result<Self, url::ParseError> {
        origins
            .into_iter()
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| Url::parse(origin).map(|url| url.origin().ascii_serialization()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn permits(&self, origin: &Url) -> bool {
        if origin.scheme() == "http" && origin.host_str() == Some("localhost") {
            return matches!(origin.port(), Some(port) if port != 0);
        }
        let serialised = origin.origin().ascii_serialization();
        self.0.iter().any(|allowed| *allowed == serialised)
    }
}

/// Dependency bundle for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    pub nearby: Arc<dyn NearbyParkingQuery>,
    pub origins: AllowedOrigins,
}

impl WsState {
    pub fn new(nearby: Arc<dyn NearbyParkingQuery>, origins: AllowedOrigins) -> Self {
        Self { nearby, origins }
    }
}
