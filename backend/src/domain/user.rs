//! Account identity and authenticated sessions.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::auth::{EmailAddress, FullName};

/// Validation errors for identity values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyAccessToken,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyAccessToken => write!(f, "access token must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// User identifier issued by the auth provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a canonical UUID string.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a random identifier; used by fixture adapters.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Profile row mirrored into the hosted `users` table at sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: UserId,
    pub full_name: FullName,
    pub email: EmailAddress,
}

/// Bearer token issued by the auth provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Result<Self, UserValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(UserValidationError::EmptyAccessToken);
        }
        Ok(Self(Zeroizing::new(token)))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Session returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: UserId,
    pub access_token: AccessToken,
    pub refresh_token: Option<AccessToken>,
    /// Lifetime of `access_token` in seconds.
    pub expires_in: Option<u64>,
}

impl AuthSession {
    /// The part of the session the service keeps in the cookie.
    pub fn user_session(&self) -> UserSession {
        UserSession {
            user_id: self.user_id,
            access_token: self.access_token.clone(),
        }
    }
}

/// Authenticated caller as seen by services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub user_id: UserId,
    pub access_token: AccessToken,
}
