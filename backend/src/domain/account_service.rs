//! Account service implementing [`AccountCommand`].
//!
//! The auth provider owns credentials. This service forwards validated input,
//! mirrors the profile row after sign-up and turns provider failures into
//! domain errors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    AccountCommand, AuthProvider, AuthProviderError, UserProfileRepository,
    UserProfileRepositoryError,
};
use crate::domain::{
    AuthSession, EmailAddress, Error, LoginCredentials, NewPassword, SignUpDetails, UserProfile,
    UserSession,
};

/// Message used when the provider accepts a sign-up without issuing an id.
pub const MISSING_USER_ID: &str = "No user ID returned from the auth provider";

/// Operation names used in provider error messages.
#[derive(Debug, Clone, Copy)]
enum AccountOperation {
    SignUp,
    Login,
    PasswordReset,
    PasswordUpdate,
}

impl AccountOperation {
    fn label(self) -> &'static str {
        match self {
            Self::SignUp => "sign-up failed",
            Self::Login => "login failed",
            Self::PasswordReset => "password reset failed",
            Self::PasswordUpdate => "password update failed",
        }
    }
}

pub struct AccountService<A: ?Sized, P: ?Sized> {
    auth: Arc<A>,
    profiles: Arc<P>,
    password_reset_redirect: Option<String>,
}

impl<A: ?Sized, P: ?Sized> AccountService<A, P> {
    pub fn new(auth: Arc<A>, profiles: Arc<P>) -> Self {
        Self {
            auth,
            profiles,
            password_reset_redirect: None,
        }
    }

    /// URL the reset email should send the user to.
    pub fn with_password_reset_redirect(mut self, redirect: Option<String>) -> Self {
        self.password_reset_redirect = redirect;
        self
    }
}

impl<A, P> AccountService<A, P>
where
    A: AuthProvider + ?Sized,
    P: UserProfileRepository + ?Sized,
{
    fn map_auth_error(operation: AccountOperation, err: AuthProviderError) -> Error {
        let label = operation.label();
        match err {
            AuthProviderError::Rejected { message } => {
                warn!(operation = label, %message, "auth provider rejected request");
                match operation {
                    AccountOperation::Login | AccountOperation::PasswordUpdate => {
                        Error::unauthorized(format!("{label}: {message}"))
                    }
                    AccountOperation::SignUp | AccountOperation::PasswordReset => {
                        Error::invalid_request(format!("{label}: {message}"))
                    }
                }
            }
            AuthProviderError::Connection { message } => {
                warn!(operation = label, %message, "auth provider unreachable");
                Error::service_unavailable(format!("{label}: auth provider unavailable"))
            }
            AuthProviderError::Decode { message } => {
                error!(operation = label, %message, "auth provider response malformed");
                Error::internal(format!("{label}: {message}"))
            }
        }
    }

    fn map_profile_error(err: UserProfileRepositoryError) -> Error {
        error!(error = %err, "profile insert failed after sign-up");
        let message = match err {
            UserProfileRepositoryError::Connection { message }
            | UserProfileRepositoryError::Rejected { message } => message,
        };
        Error::internal(format!("error saving user details: {message}"))
    }
}

#[async_trait]
impl<A, P> AccountCommand for AccountService<A, P>
where
    A: AuthProvider + ?Sized,
    P: UserProfileRepository + ?Sized,
{
    async fn sign_up(&self, details: &SignUpDetails) -> Result<UserProfile, Error> {
        let user_id = self
            .auth
            .sign_up(details.email(), details.password())
            .await
            .map_err(|err| Self::map_auth_error(AccountOperation::SignUp, err))?
            .ok_or_else(|| Error::service_unavailable(MISSING_USER_ID))?;

        let profile = UserProfile {
            user_id,
            full_name: details.full_name().clone(),
            email: details.email().clone(),
        };
        self.profiles
            .insert(&profile)
            .await
            .map_err(Self::map_profile_error)?;
        info!(user_id = %profile.user_id, "account created");
        Ok(profile)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        self.auth
            .sign_in(credentials)
            .await
            .map_err(|err| Self::map_auth_error(AccountOperation::Login, err))
    }

    async fn request_password_reset(&self, email: &EmailAddress) -> Result<String, Error> {
        self.auth
            .send_password_reset(email, self.password_reset_redirect.clone())
            .await
            .map_err(|err| Self::map_auth_error(AccountOperation::PasswordReset, err))?;
        Ok(email.masked())
    }

    async fn update_password(
        &self,
        session: &UserSession,
        password: &NewPassword,
    ) -> Result<(), Error> {
        self.auth
            .update_password(&session.access_token, password)
            .await
            .map_err(|err| Self::map_auth_error(AccountOperation::PasswordUpdate, err))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
