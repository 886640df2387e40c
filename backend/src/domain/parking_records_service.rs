//! Service implementing [`ParkingRecordsCommand`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, warn};

use crate::domain::ports::{
    ParkingRecordsCommand, ParkingRecordsRepository, ParkingRecordsRepositoryError,
};
use crate::domain::{
    Error, ParkingHistoryEntry, ParkingSpotRecord, SavedParkingSpot, UserSession,
};

pub struct ParkingRecordsService<R: ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> ParkingRecordsService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> ParkingRecordsService<R>
where
    R: ParkingRecordsRepository + ?Sized,
{
    fn map_repository_error(err: ParkingRecordsRepositoryError) -> Error {
        match err {
            ParkingRecordsRepositoryError::Connection { message } => {
                warn!(%message, "parking records backend unreachable");
                Error::service_unavailable("parking records are temporarily unavailable")
            }
            ParkingRecordsRepositoryError::Rejected { message } => {
                error!(%message, "parking record write rejected");
                Error::internal(format!("parking record write rejected: {message}"))
            }
        }
    }
}

#[async_trait]
impl<R> ParkingRecordsCommand for ParkingRecordsService<R>
where
    R: ParkingRecordsRepository + ?Sized,
{
    async fn save_spot(
        &self,
        session: &UserSession,
        spot: ParkingSpotRecord,
    ) -> Result<SavedParkingSpot, Error> {
        let saved = SavedParkingSpot {
            user_id: session.user_id,
            spot,
            saved_at: self.clock.utc(),
        };
        self.repository
            .upsert_saved_spot(session, &saved)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(saved)
    }

    async fn record_visit(
        &self,
        session: &UserSession,
        spot: ParkingSpotRecord,
    ) -> Result<ParkingHistoryEntry, Error> {
        let entry = ParkingHistoryEntry {
            user_id: session.user_id,
            spot,
            parked_at: self.clock.utc(),
        };
        self.repository
            .insert_history(session, &entry)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(entry)
    }
}
