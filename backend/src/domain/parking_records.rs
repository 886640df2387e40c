//! Per-user parking records: saved spots and visit history.

use chrono::{DateTime, Utc};

use crate::domain::geo::Coordinate;
use crate::domain::parking::{ParkingSpotId, ParkingValidationError};
use crate::domain::user::UserId;

/// Parking place as submitted by the client for saving or recording.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingSpotRecord {
    parking_id: ParkingSpotId,
    name: String,
    coordinate: Coordinate,
}

impl ParkingSpotRecord {
    pub fn new(
        parking_id: ParkingSpotId,
        name: &str,
        coordinate: Coordinate,
    ) -> Result<Self, ParkingValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ParkingValidationError::EmptyName);
        }
        Ok(Self {
            parking_id,
            name: name.to_owned(),
            coordinate,
        })
    }

    pub fn parking_id(&self) -> &ParkingSpotId {
        &self.parking_id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }
}

/// Row upserted into `saved_parking_spots`.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedParkingSpot {
    pub user_id: UserId,
    pub spot: ParkingSpotRecord,
    pub saved_at: DateTime<Utc>,
}

/// Row inserted into `parking_history`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingHistoryEntry {
    pub user_id: UserId,
    pub spot: ParkingSpotRecord,
    pub parked_at: DateTime<Utc>,
}
