//! Driving port for account use-cases.

use async_trait::async_trait;

use crate::domain::{
    AuthSession, EmailAddress, Error, LoginCredentials, NewPassword, SignUpDetails, UserProfile,
    UserSession,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register an account and store its profile.
    async fn sign_up(&self, details: &SignUpDetails) -> Result<UserProfile, Error>;

    /// Authenticate and return the provider session.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Send a reset link and return the masked address it went to.
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<String, Error>;

    /// Change the signed-in user's password.
    async fn update_password(
        &self,
        session: &UserSession,
        password: &NewPassword,
    ) -> Result<(), Error>;
}
