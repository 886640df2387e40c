//! Driving port for saving spots and recording visits.

use async_trait::async_trait;

use crate::domain::{
    Error, ParkingHistoryEntry, ParkingSpotRecord, SavedParkingSpot, UserSession,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParkingRecordsCommand: Send + Sync {
    /// Save (or re-save) a spot for the signed-in user.
    async fn save_spot(
        &self,
        session: &UserSession,
        spot: ParkingSpotRecord,
    ) -> Result<SavedParkingSpot, Error>;

    /// Record that the signed-in user parked at a spot.
    async fn record_visit(
        &self,
        session: &UserSession,
        spot: ParkingSpotRecord,
    ) -> Result<ParkingHistoryEntry, Error>;
}
