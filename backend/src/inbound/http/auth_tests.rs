//! Handler tests for the account endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test};
use serde_json::{Value, json};

use super::*;
use crate::domain::account_service::MISSING_USER_ID;
use crate::domain::{
    AccessToken, AuthSession, ErrorCode, FullName, UserId, UserProfile, UserSession,
};
use crate::inbound::http::test_utils::{
    MockPorts, TEST_ACCESS_TOKEN, TEST_USER_ID, session_cookie, sign_in_route, signed_in_cookie,
    test_session_middleware, test_user_session,
};

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(ports.into_state())
        .wrap(test_session_middleware())
        .configure(sign_in_route)
        .service(
            web::scope("/api/v1")
                .service(sign_up)
                .service(login)
                .service(logout)
                .service(request_password_reset)
                .service(update_password),
        )
}

fn profile() -> UserProfile {
    UserProfile {
        user_id: UserId::new(TEST_USER_ID).expect("user id"),
        full_name: FullName::parse("Maria Clara").expect("name"),
        email: EmailAddress::parse("maria@example.org").expect("email"),
    }
}

fn auth_session() -> AuthSession {
    AuthSession {
        user_id: UserId::new(TEST_USER_ID).expect("user id"),
        access_token: AccessToken::new(TEST_ACCESS_TOKEN).expect("token"),
        refresh_token: None,
        expires_in: Some(3600),
    }
}

#[actix_web::test]
async fn sign_up_returns_created_profile() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_sign_up()
        .withf(|details| {
            details.full_name().as_ref() == "Maria Clara"
                && details.email().as_ref() == "maria@example.org"
        })
        .times(1)
        .returning(|_| Ok(profile()));
    let app = test::init_service(test_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({
                "fullName": " Maria Clara ",
                "email": "Maria@Example.org",
                "password": "Sp4rk!ng",
                "confirmPassword": "Sp4rk!ng",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"userId": TEST_USER_ID, "email": "maria@example.org"})
    );
}

#[actix_web::test]
async fn sign_up_without_user_id_reports_the_provider_message() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_sign_up()
        .times(1)
        .returning(|_| Err(Error::service_unavailable(MISSING_USER_ID)));
    let app = test::init_service(test_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({
                "fullName": "Maria Clara",
                "email": "maria@example.org",
                "password": "Sp4rk!ng",
                "confirmPassword": "Sp4rk!ng",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Error = test::read_body_json(res).await;
    assert_eq!(body.message(), MISSING_USER_ID);
}

#[actix_web::test]
async fn sign_up_with_mismatched_passwords_never_reaches_the_provider() {
    let app = test::init_service(test_app(MockPorts::default())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({
                "fullName": "Maria Clara",
                "email": "maria@example.org",
                "password": "Sp4rk!ng",
                "confirmPassword": "Sp4rk!ng?",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Error = test::read_body_json(res).await;
    assert_eq!(body.message(), "Passwords do not match.");
    assert_eq!(
        body.details(),
        Some(&json!({"field": "confirmPassword", "code": "password_mismatch"}))
    );
}

#[actix_web::test]
async fn login_sets_session_used_by_password_update() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_login()
        .withf(|creds| creds.email().as_ref() == "maria@example.org")
        .times(1)
        .returning(|_| Ok(auth_session()));
    ports
        .accounts
        .expect_update_password()
        .withf(|session: &UserSession, password: &NewPassword| {
            *session == test_user_session() && password.expose() == "N3w!pass"
        })
        .times(1)
        .returning(|_, _| Ok(()));
    let app = test::init_service(test_app(ports)).await;

    let login_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "maria@example.org", "password": "whatever"}))
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = session_cookie(&login_res);
    let body: Value = test::read_body_json(login_res).await;
    assert_eq!(body, json!({"userId": TEST_USER_ID}));

    let update_res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/auth/password")
            .cookie(cookie)
            .set_json(json!({"password": "N3w!pass", "confirmPassword": "N3w!pass"}))
            .to_request(),
    )
    .await;
    assert_eq!(update_res.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn rejected_login_is_unauthorised() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_login()
        .returning(|_| Err(Error::unauthorized("login failed: Invalid login credentials")));
    let app = test::init_service(test_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "maria@example.org", "password": "nope"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(
        res.response()
            .cookies()
            .all(|cookie| cookie.name() != "session")
    );
}

#[actix_web::test]
async fn login_with_blank_password_is_invalid() {
    let app = test::init_service(test_app(MockPorts::default())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "maria@example.org", "password": ""}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Error = test::read_body_json(res).await;
    assert_eq!(body.code(), ErrorCode::InvalidRequest);
}

#[actix_web::test]
async fn password_update_requires_a_session() {
    let app = test::init_service(test_app(MockPorts::default())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/auth/password")
            .set_json(json!({"password": "N3w!pass", "confirmPassword": "N3w!pass"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn weak_new_password_is_rejected() {
    let app = test::init_service(test_app(MockPorts::default())).await;
    let cookie = signed_in_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/auth/password")
            .cookie(cookie)
            .set_json(json!({"password": "password", "confirmPassword": "password"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Error = test::read_body_json(res).await;
    assert_eq!(
        body.details(),
        Some(&json!({"field": "password", "code": "weak_password"}))
    );
}

#[actix_web::test]
async fn password_reset_reports_masked_address() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_request_password_reset()
        .times(1)
        .returning(|email| Ok(email.masked()));
    let app = test::init_service(test_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/password-reset")
            .set_json(json!({"email": "maria@example.org"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"maskedEmail": "ma****ia@example.org"}));
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let app = test::init_service(test_app(MockPorts::default())).await;
    let cookie = signed_in_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(session_cookie(&res).value(), "");
}
