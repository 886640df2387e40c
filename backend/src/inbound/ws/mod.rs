//! WebSocket inbound adapter for live nearby-parking updates.
//!
//! Responsibilities:
//! - validate upgrade requests against the origin allow-list
//! - run the per-connection session loop
//! - keep WebSocket-specific concerns at the edge of the system
//!
//! Native clients send no `Origin` header and are accepted; browsers always
//! send one, so the allow-list still guards against cross-site pages.

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, warn};
use url::Url;

mod session;

pub mod messages;
pub mod state;

use state::AllowedOrigins;

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    body: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    if let Some(origin_header) = origin_iter.next() {
        if origin_iter.next().is_some() {
            error!("Multiple Origin headers on WebSocket upgrade");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
        validate_origin(&state.origins, origin_header)?;
    }

    let (response, session, stream) = actix_ws::handle(&req, body).map_err(|error| {
        warn!(error = %error, "WebSocket upgrade failed");
        error
    })?;
    actix_web::rt::spawn(session::handle_ws_session(
        state.nearby.clone(),
        session,
        stream,
    ));
    Ok(response)
}

fn validate_origin(allowed: &AllowedOrigins, origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            error!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if allowed.permits(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}
