//! Wire shapes for GoTrue and PostgREST.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ParkingHistoryEntry, SavedParkingSpot, UserProfile};

#[derive(Debug, Serialize)]
pub(super) struct CredentialsBody<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct RecoverBody<'a> {
    pub(super) email: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct PasswordBody<'a> {
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: Option<Uuid>,
}

/// Sign-up reply: the bare user when email confirmation is pending,
/// otherwise a session wrapping the user.
#[derive(Debug, Deserialize)]
pub(super) struct SignUpReplyDto {
    pub(super) id: Option<Uuid>,
    pub(super) user: Option<UserDto>,
}

impl SignUpReplyDto {
    pub(super) fn user_id(&self) -> Option<Uuid> {
        self.id
            .or_else(|| self.user.as_ref().and_then(|user| user.id))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenReplyDto {
    pub(super) access_token: String,
    pub(super) refresh_token: Option<String>,
    pub(super) expires_in: Option<u64>,
    pub(super) user: UserDto,
}

/// Error payloads vary by endpoint; take whichever field is present.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorReplyDto {
    pub(super) msg: Option<String>,
    pub(super) error_description: Option<String>,
    pub(super) message: Option<String>,
    pub(super) error: Option<String>,
}

impl ErrorReplyDto {
    pub(super) fn into_message(self) -> Option<String> {
        self.msg
            .or(self.error_description)
            .or(self.message)
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UserRow<'a> {
    pub(super) user_id: String,
    pub(super) full_name: &'a str,
    pub(super) email: &'a str,
}

impl<'a> From<&'a UserProfile> for UserRow<'a> {
    fn from(profile: &'a UserProfile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            full_name: profile.full_name.as_ref(),
            email: profile.email.as_ref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SavedSpotRow<'a> {
    pub(super) user_id: String,
    pub(super) parking_id: &'a str,
    pub(super) name: &'a str,
    pub(super) latitude: f64,
    pub(super) longitude: f64,
    pub(super) saved_at: DateTime<Utc>,
}

impl<'a> From<&'a SavedParkingSpot> for SavedSpotRow<'a> {
    fn from(saved: &'a SavedParkingSpot) -> Self {
        Self {
            user_id: saved.user_id.to_string(),
            parking_id: saved.spot.parking_id().as_ref(),
            name: saved.spot.name(),
            latitude: saved.spot.coordinate().latitude(),
            longitude: saved.spot.coordinate().longitude(),
            saved_at: saved.saved_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct HistoryRow<'a> {
    pub(super) user_id: String,
    pub(super) parking_id: &'a str,
    pub(super) name: &'a str,
    pub(super) latitude: f64,
    pub(super) longitude: f64,
    pub(super) parked_at: DateTime<Utc>,
}

impl<'a> From<&'a ParkingHistoryEntry> for HistoryRow<'a> {
    fn from(entry: &'a ParkingHistoryEntry) -> Self {
        Self {
            user_id: entry.user_id.to_string(),
            parking_id: entry.spot.parking_id().as_ref(),
            name: entry.spot.name(),
            latitude: entry.spot.coordinate().latitude(),
            longitude: entry.spot.coordinate().longitude(),
            parked_at: entry.parked_at,
        }
    }
}
