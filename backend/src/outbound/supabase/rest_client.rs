//! PostgREST-backed repositories for profile and parking rows.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use super::client::SupabaseClient;
use super::dto::{HistoryRow, SavedSpotRow, UserRow};
use crate::domain::ports::{
    ParkingRecordsRepository, ParkingRecordsRepositoryError, UserProfileRepository,
    UserProfileRepositoryError,
};
use crate::domain::{ParkingHistoryEntry, SavedParkingSpot, UserProfile, UserSession};

const USERS_TABLE: &str = "users";
const SAVED_SPOTS_TABLE: &str = "saved_parking_spots";
const HISTORY_TABLE: &str = "parking_history";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Insert,
    Upsert,
}

impl WriteMode {
    fn prefer(self) -> &'static str {
        match self {
            Self::Insert => "return=minimal",
            Self::Upsert => "resolution=merge-duplicates,return=minimal",
        }
    }
}

/// Failure of one table write, before mapping into a port error.
enum WriteFailure {
    Connection(String),
    Rejected(String),
}

pub struct SupabaseRestRepository {
    client: Arc<SupabaseClient>,
}

impl SupabaseRestRepository {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }

    async fn write<T: Serialize + Sync>(
        &self,
        table: &str,
        row: &T,
        mode: WriteMode,
        bearer: Option<&str>,
    ) -> Result<(), WriteFailure> {
        let url = self.client.endpoint(&["rest", "v1", table]);
        let request = self
            .client
            .request(Method::POST, url, bearer)
            .header("Prefer", mode.prefer())
            .json(&[row]);
        let reply = self
            .client
            .send(request)
            .await
            .map_err(|err| WriteFailure::Connection(err.to_string()))?;
        if reply.status.is_success() {
            return Ok(());
        }
        let message = reply.error_message();
        if reply.status.is_server_error() {
            Err(WriteFailure::Connection(message))
        } else {
            Err(WriteFailure::Rejected(message))
        }
    }
}

impl From<WriteFailure> for UserProfileRepositoryError {
    fn from(value: WriteFailure) -> Self {
        match value {
            WriteFailure::Connection(message) => Self::connection(message),
            WriteFailure::Rejected(message) => Self::rejected(message),
        }
    }
}

impl From<WriteFailure> for ParkingRecordsRepositoryError {
    fn from(value: WriteFailure) -> Self {
        match value {
            WriteFailure::Connection(message) => Self::connection(message),
            WriteFailure::Rejected(message) => Self::rejected(message),
        }
    }
}

#[async_trait]
impl UserProfileRepository for SupabaseRestRepository {
    async fn insert(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
        self.write(USERS_TABLE, &UserRow::from(profile), WriteMode::Insert, None)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl ParkingRecordsRepository for SupabaseRestRepository {
    async fn upsert_saved_spot(
        &self,
        session: &UserSession,
        spot: &SavedParkingSpot,
    ) -> Result<(), ParkingRecordsRepositoryError> {
        self.write(
            SAVED_SPOTS_TABLE,
            &SavedSpotRow::from(spot),
            WriteMode::Upsert,
            Some(session.access_token.expose()),
        )
        .await
        .map_err(Into::into)
    }

    async fn insert_history(
        &self,
        session: &UserSession,
        entry: &ParkingHistoryEntry,
    ) -> Result<(), ParkingRecordsRepositoryError> {
        self.write(
            HISTORY_TABLE,
            &HistoryRow::from(entry),
            WriteMode::Insert,
            Some(session.access_token.expose()),
        )
        .await
        .map_err(Into::into)
    }
}
