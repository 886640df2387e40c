//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects the REST paths from the inbound HTTP layer together
//! with the wire schemas and the session cookie security scheme. The
//! generated document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{
    LoginRequest, LoginResponse, PasswordResetRequest, PasswordResetResponse,
    PasswordUpdateRequest, SignUpRequest, SignUpResponse,
};
use crate::inbound::http::parking::ParkingSpotRequest;
use crate::inbound::http::places::PlaceNameResponse;
use crate::inbound::http::schemas::{
    CoordinateBody, NearbyParkingBody, ParkingSpotBody, PlaceBody,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(title = "Spark parking API", description = "Nearby parking lookup and accounts."),
    paths(
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::request_password_reset,
        crate::inbound::http::auth::update_password,
        crate::inbound::http::parking::nearby,
        crate::inbound::http::parking::search,
        crate::inbound::http::parking::save_spot,
        crate::inbound::http::parking::record_visit,
        crate::inbound::http::places::reverse,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SignUpRequest,
        SignUpResponse,
        LoginRequest,
        LoginResponse,
        PasswordResetRequest,
        PasswordResetResponse,
        PasswordUpdateRequest,
        ParkingSpotRequest,
        PlaceNameResponse,
        CoordinateBody,
        ParkingSpotBody,
        PlaceBody,
        NearbyParkingBody,
    )),
    tags(
        (name = "auth", description = "Sign-up, login and password management"),
        (name = "parking", description = "Nearby parking lookup and saved spots"),
        (name = "places", description = "Reverse geocoding"),
        (name = "health", description = "Endpoints for health checks")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;
