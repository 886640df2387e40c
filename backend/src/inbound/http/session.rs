//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The encrypted session cookie carries the signed-in user's id and provider
//! access token; handlers only deal with [`UserSession`].

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AccessToken, Error, UserId, UserSession};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in user in the session cookie.
    pub fn persist(&self, session: &UserSession) -> Result<(), Error> {
        self.0.renew();
        self.insert(USER_ID_KEY, session.user_id.to_string())?;
        self.insert(ACCESS_TOKEN_KEY, session.access_token.expose().to_owned())
    }

    fn insert(&self, key: &str, value: String) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn read(&self, key: &str) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// The signed-in user, if the cookie carries a usable one.
    pub fn user_session(&self) -> Result<Option<UserSession>, Error> {
        let (Some(raw_id), Some(raw_token)) = (self.read(USER_ID_KEY)?, self.read(ACCESS_TOKEN_KEY)?)
        else {
            return Ok(None);
        };
        let user_id = match UserId::new(&raw_id) {
            Ok(id) => id,
            Err(error) => {
                warn!("invalid user id in session cookie: {error}");
                return Ok(None);
            }
        };
        let access_token = match AccessToken::new(raw_token) {
            Ok(token) => token,
            Err(error) => {
                warn!("invalid access token in session cookie: {error}");
                return Ok(None);
            }
        };
        Ok(Some(UserSession {
            user_id,
            access_token,
        }))
    }

    /// Require a signed-in user or return `401 Unauthorized`.
    pub fn require_session(&self) -> Result<UserSession, Error> {
        self.user_session()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop everything stored for this client.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
