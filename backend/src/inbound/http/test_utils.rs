//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::ports::{MockAccountCommand, MockNearbyParkingQuery, MockParkingRecordsCommand};
use crate::domain::{AccessToken, Error, UserId, UserSession};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub const TEST_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
pub const TEST_ACCESS_TOKEN: &str = "access-123";
pub const SIGN_IN_PATH: &str = "/test/sign-in";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

pub fn test_user_session() -> UserSession {
    UserSession {
        user_id: UserId::new(TEST_USER_ID).expect("fixture user id"),
        access_token: AccessToken::new(TEST_ACCESS_TOKEN).expect("fixture token"),
    }
}

/// Mock-backed state; a mock without expectations panics if called.
#[derive(Default)]
pub struct MockPorts {
    pub nearby: MockNearbyParkingQuery,
    pub accounts: MockAccountCommand,
    pub records: MockParkingRecordsCommand,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.nearby),
            Arc::new(self.accounts),
            Arc::new(self.records),
        ))
    }
}

/// Route that signs in [`test_user_session`] without an auth provider.
pub fn sign_in_route(cfg: &mut web::ServiceConfig) {
    cfg.route(
        SIGN_IN_PATH,
        web::post().to(|session: SessionContext| async move {
            session.persist(&test_user_session())?;
            Ok::<_, Error>(HttpResponse::NoContent().finish())
        }),
    );
}

/// Session cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Sign in through [`sign_in_route`] and return the session cookie.
pub async fn signed_in_cookie<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(app, test::TestRequest::post().uri(SIGN_IN_PATH).to_request())
        .await;
    session_cookie(&res)
}
