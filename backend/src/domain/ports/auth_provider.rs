//! Driven port for the hosted authentication provider.
//!
//! The provider owns password storage; the service only forwards validated
//! credentials and keeps the returned session.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{
    AccessToken, AuthSession, EmailAddress, LoginCredentials, NewPassword, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by auth provider adapters.
    pub enum AuthProviderError {
        /// The provider refused the request (bad credentials, duplicate user).
        Rejected { message: String } => "auth provider rejected request: {message}",
        /// The provider could not be reached.
        Connection { message: String } => "auth provider connection failed: {message}",
        /// The provider answered with an unexpected payload.
        Decode { message: String } => "auth provider response decode failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register a new account. `None` means the provider issued no user id.
    async fn sign_up(
        &self,
        email: &EmailAddress,
        password: &NewPassword,
    ) -> Result<Option<UserId>, AuthProviderError>;

    /// Exchange email and password for a session.
    async fn sign_in(&self, credentials: &LoginCredentials)
    -> Result<AuthSession, AuthProviderError>;

    /// Ask the provider to email a reset link.
    async fn send_password_reset(
        &self,
        email: &EmailAddress,
        redirect_to: Option<String>,
    ) -> Result<(), AuthProviderError>;

    /// Replace the password of the account owning `access_token`.
    async fn update_password(
        &self,
        access_token: &AccessToken,
        password: &NewPassword,
    ) -> Result<(), AuthProviderError>;
}

#[derive(Debug, Clone)]
struct FixtureAccount {
    user_id: UserId,
    password: String,
    token: String,
}

/// In-memory provider used when no hosted backend is configured.
///
/// Accounts live for the lifetime of the process. Access tokens are the
/// user id prefixed with `fixture-`.
#[derive(Debug, Default)]
pub struct FixtureAuthProvider {
    accounts: Mutex<HashMap<String, FixtureAccount>>,
}

impl FixtureAuthProvider {
    fn with_accounts<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, FixtureAccount>) -> R,
    ) -> Result<R, AuthProviderError> {
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| AuthProviderError::connection("fixture account store poisoned"))?;
        Ok(f(&mut accounts))
    }
}

#[async_trait]
impl AuthProvider for FixtureAuthProvider {
    async fn sign_up(
        &self,
        email: &EmailAddress,
        password: &NewPassword,
    ) -> Result<Option<UserId>, AuthProviderError> {
        self.with_accounts(|accounts| {
            if accounts.contains_key(email.as_ref()) {
                return Err(AuthProviderError::rejected("User already registered"));
            }
            let user_id = UserId::random();
            accounts.insert(
                email.as_ref().to_owned(),
                FixtureAccount {
                    user_id,
                    password: password.expose().to_owned(),
                    token: format!("fixture-{user_id}"),
                },
            );
            Ok(Some(user_id))
        })?
    }

    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthSession, AuthProviderError> {
        let account = self.with_accounts(|accounts| {
            accounts
                .get(credentials.email().as_ref())
                .filter(|account| account.password == credentials.password())
                .cloned()
        })?;
        let account =
            account.ok_or_else(|| AuthProviderError::rejected("Invalid login credentials"))?;
        let access_token = AccessToken::new(account.token)
            .map_err(|err| AuthProviderError::decode(err.to_string()))?;
        Ok(AuthSession {
            user_id: account.user_id,
            access_token,
            refresh_token: None,
            expires_in: None,
        })
    }

    async fn send_password_reset(
        &self,
        _email: &EmailAddress,
        _redirect_to: Option<String>,
    ) -> Result<(), AuthProviderError> {
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &AccessToken,
        password: &NewPassword,
    ) -> Result<(), AuthProviderError> {
        self.with_accounts(|accounts| {
            let account = accounts
                .values_mut()
                .find(|account| account.token == access_token.expose())
                .ok_or_else(|| AuthProviderError::rejected("invalid access token"))?;
            account.password = password.expose().to_owned();
            Ok(())
        })?
    }
}
