//! Port abstraction for the saved-spot and parking-history tables.
//!
//! Writes run on behalf of the signed-in user so row-level security on the
//! hosted tables sees their access token.

use async_trait::async_trait;

use crate::domain::{ParkingHistoryEntry, SavedParkingSpot, UserSession};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by parking record adapters.
    pub enum ParkingRecordsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "parking records connection failed: {message}",
        /// The backend refused the write.
        Rejected { message: String } => "parking records write rejected: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParkingRecordsRepository: Send + Sync {
    /// Insert or merge a saved spot keyed by user and parking id.
    async fn upsert_saved_spot(
        &self,
        session: &UserSession,
        spot: &SavedParkingSpot,
    ) -> Result<(), ParkingRecordsRepositoryError>;

    /// Append a parking visit.
    async fn insert_history(
        &self,
        session: &UserSession,
        entry: &ParkingHistoryEntry,
    ) -> Result<(), ParkingRecordsRepositoryError>;
}

/// Repository that accepts every write without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureParkingRecordsRepository;

#[async_trait]
impl ParkingRecordsRepository for FixtureParkingRecordsRepository {
    async fn upsert_saved_spot(
        &self,
        _session: &UserSession,
        _spot: &SavedParkingSpot,
    ) -> Result<(), ParkingRecordsRepositoryError> {
        Ok(())
    }

    async fn insert_history(
        &self,
        _session: &UserSession,
        _entry: &ParkingHistoryEntry,
    ) -> Result<(), ParkingRecordsRepositoryError> {
        Ok(())
    }
}
