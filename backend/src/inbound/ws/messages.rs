//! Wire-level message definitions for the WebSocket adapter.
//!
//! Every frame is a JSON object tagged by `type`. Clients send
//! `locationUpdate` or `search`; the server answers with `parkingUpdated`
//! or `refreshFailed`, echoing the client's `traceId` and the refresh
//! `generation` so a client can ignore anything older than what it shows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{Error, ErrorCode, TraceId};
use crate::inbound::http::schemas::NearbyParkingBody;

/// Inbound request payload provided by the client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// New device position from the location stream.
    LocationUpdate {
        trace_id: Uuid,
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        radius_meters: Option<f64>,
        #[serde(default)]
        name_filter: Option<String>,
    },
    /// Free-text place search.
    Search {
        trace_id: Uuid,
        query: String,
        #[serde(default)]
        radius_meters: Option<f64>,
        #[serde(default)]
        name_filter: Option<String>,
    },
}

impl ClientMessage {
    pub fn trace_id(&self) -> TraceId {
        match self {
            Self::LocationUpdate { trace_id, .. } | Self::Search { trace_id, .. } => {
                TraceId::from_uuid(*trace_id)
            }
        }
    }
}

/// Outbound payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    ParkingUpdated {
        trace_id: Uuid,
        generation: u64,
        parking: NearbyParkingBody,
    },
    /// The refresh failed; the client keeps showing its previous results.
    RefreshFailed {
        trace_id: Uuid,
        /// Absent when the request was rejected before a refresh started.
        #[serde(skip_serializing_if = "Option::is_none")]
        generation: Option<u64>,
        code: ErrorCode,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
}

impl ServerMessage {
    pub fn refresh_failed(trace_id: TraceId, generation: Option<u64>, error: &Error) -> Self {
        let (message, details) = if error.code() == ErrorCode::InternalError {
            ("Internal server error".to_owned(), None)
        } else {
            (error.message().to_owned(), error.details().cloned())
        };
        Self::RefreshFailed {
            trace_id: *trace_id.as_uuid(),
            generation,
            code: error.code(),
            message,
            details,
        }
    }
}
