//! Reqwest-backed Overpass source adapter.
//!
//! This adapter owns transport details only: query text, identity headers,
//! HTTP error mapping and JSON decoding into domain POIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::dto::OverpassResponseDto;
use crate::domain::ParkingPoi;
use crate::domain::ports::{ParkingPoiQuery, ParkingPoiSource, ParkingPoiSourceError};
use crate::outbound::http_support::{
    FailureKind, HttpIdentity, build_client, classify_status, classify_transport, status_message,
};

/// Timeout directive embedded in the query text, in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECONDS: u32 = 25;

/// Overpass source adapter that POSTs queries to one endpoint.
pub struct OverpassHttpSource {
    client: Client,
    endpoint: Url,
    identity: HttpIdentity,
    query_timeout_seconds: u32,
}

impl OverpassHttpSource {
    /// Build an adapter with an explicit request timeout and identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        timeout: Duration,
        identity: HttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint,
            identity,
            query_timeout_seconds: DEFAULT_QUERY_TIMEOUT_SECONDS,
        })
    }

    /// Override the `[timeout:N]` directive sent to Overpass.
    pub fn with_query_timeout(mut self, seconds: u32) -> Self {
        self.query_timeout_seconds = seconds.max(1);
        self
    }
}

#[async_trait]
impl ParkingPoiSource for OverpassHttpSource {
    async fn fetch_parking(
        &self,
        query: &ParkingPoiQuery,
    ) -> Result<Vec<ParkingPoi>, ParkingPoiSourceError> {
        let text = build_parking_query(query, self.query_timeout_seconds);
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.identity.user_agent.as_str())
            .header("Contact", self.identity.contact.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("data", text)])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let message = status_message(status, body.as_ref());
            return Err(map_failure(classify_status(status), message));
        }
        parse_pois(body.as_ref())
    }
}

fn parse_pois(body: &[u8]) -> Result<Vec<ParkingPoi>, ParkingPoiSourceError> {
    let decoded: OverpassResponseDto = serde_json::from_slice(body).map_err(|error| {
        ParkingPoiSourceError::decode(format!("invalid Overpass JSON payload: {error}"))
    })?;
    Ok(decoded.into_parking_pois())
}

fn build_parking_query(query: &ParkingPoiQuery, query_timeout_seconds: u32) -> String {
    let around = format!(
        "(around:{radius},{lat},{lng})",
        radius = query.radius.meters(),
        lat = query.origin.latitude(),
        lng = query.origin.longitude(),
    );
    let lines = ["node", "way", "relation"]
        .into_iter()
        .map(|element_type| format!("  {element_type}[\"amenity\"=\"parking\"]{around};"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("[out:json][timeout:{query_timeout_seconds}];\n(\n{lines}\n);\nout center tags;")
}

fn map_failure(kind: FailureKind, message: String) -> ParkingPoiSourceError {
    match kind {
        FailureKind::RateLimited => ParkingPoiSourceError::rate_limited(message),
        FailureKind::Timeout => ParkingPoiSourceError::timeout(message),
        FailureKind::InvalidRequest => ParkingPoiSourceError::invalid_request(message),
        FailureKind::Transport => ParkingPoiSourceError::transport(message),
    }
}

fn map_transport_error(error: reqwest::Error) -> ParkingPoiSourceError {
    map_failure(classify_transport(&error), error.to_string())
}
