//! Port abstraction for the hosted `users` profile table.
use async_trait::async_trait;

use crate::domain::UserProfile;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by profile repository adapters.
    pub enum UserProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user profile connection failed: {message}",
        /// The backend refused the write.
        Rejected { message: String } => "user profile write rejected: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Insert the profile created at sign-up.
    async fn insert(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError>;
}

/// Repository that accepts every write without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserProfileRepository;

#[async_trait]
impl UserProfileRepository for FixtureUserProfileRepository {
    async fn insert(&self, _profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
        Ok(())
    }
}
