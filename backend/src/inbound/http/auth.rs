//! Account API handlers.
//!
//! ```text
//! POST /api/v1/auth/signup {"fullName":"Maria Clara","email":"maria@example.org","password":"Sp4rk!ng","confirmPassword":"Sp4rk!ng"}
//! POST /api/v1/auth/login {"email":"maria@example.org","password":"Sp4rk!ng"}
//! POST /api/v1/auth/logout
//! POST /api/v1/auth/password-reset {"email":"maria@example.org"}
//! PUT  /api/v1/auth/password {"password":"N3w!pass","confirmPassword":"N3w!pass"}
//! ```

use actix_web::{HttpResponse, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{EmailAddress, Error, LoginCredentials, NewPassword, SignUpDetails};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::credential_error;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetResponse {
    /// Address the link went to, e.g. `ma****ia@example.org`.
    pub masked_email: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateRequest {
    pub password: String,
    pub confirm_password: String,
}

/// Create an account and its profile row.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = SignUpResponse),
        (status = 400, description = "Invalid details or rejected by the auth provider", body = Error),
        (status = 503, description = "Auth provider unreachable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signUp"
)]
#[post("/auth/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let SignUpRequest {
        full_name,
        email,
        password,
        confirm_password,
    } = payload.into_inner();
    let details = SignUpDetails::try_from_parts(&full_name, &email, &password, &confirm_password)
        .map_err(|err| credential_error(&err))?;
    let profile = state.accounts.sign_up(&details).await?;
    Ok(HttpResponse::Created().json(SignUpResponse {
        user_id: profile.user_id.to_string(),
        email: profile.email.to_string(),
    }))
}

/// Sign in and establish a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Auth provider unreachable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|err| credential_error(&err))?;
    let auth = state.accounts.login(&credentials).await?;
    session.persist(&auth.user_session())?;
    info!(user_id = %auth.user_id, "signed in");
    Ok(HttpResponse::Ok().json(LoginResponse {
        user_id: auth.user_id.to_string(),
    }))
}

/// Drop the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Email a password reset link.
#[utoipa::path(
    post,
    path = "/api/v1/auth/password-reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 202, description = "Reset link sent", body = PasswordResetResponse),
        (status = 400, description = "Invalid email", body = Error),
        (status = 503, description = "Auth provider unreachable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "requestPasswordReset"
)]
#[post("/auth/password-reset")]
pub async fn request_password_reset(
    state: web::Data<HttpState>,
    payload: web::Json<PasswordResetRequest>,
) -> ApiResult<HttpResponse> {
    let email = EmailAddress::parse(&payload.email).map_err(|err| credential_error(&err))?;
    let masked_email = state.accounts.request_password_reset(&email).await?;
    Ok(HttpResponse::Accepted().json(PasswordResetResponse { masked_email }))
}

/// Change the signed-in user's password.
#[utoipa::path(
    put,
    path = "/api/v1/auth/password",
    request_body = PasswordUpdateRequest,
    responses(
        (status = 204, description = "Password updated"),
        (status = 400, description = "Weak or mismatched password", body = Error),
        (status = 401, description = "Login required or session expired", body = Error),
        (status = 503, description = "Auth provider unreachable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "updatePassword"
)]
#[put("/auth/password")]
pub async fn update_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PasswordUpdateRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_session()?;
    let password = NewPassword::parse(&payload.password, &payload.confirm_password)
        .map_err(|err| credential_error(&err))?;
    state.accounts.update_password(&user, &password).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
