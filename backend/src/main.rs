//! Backend entry-point: loads settings, wires adapters and serves HTTP.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::{MapServices, ServerConfig, create_server};
use spark_backend::inbound::http::health::HealthState;
use spark_backend::inbound::http::session_config::{BuildMode, session_settings};
use spark_backend::inbound::ws::state::AllowedOrigins;
use spark_backend::settings::SparkSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = SparkSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = server_config(&settings)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

fn server_config(settings: &SparkSettings) -> std::io::Result<ServerConfig> {
    let session = session_settings(settings, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let map_services = MapServices {
        overpass: settings.overpass_endpoint().map_err(std::io::Error::other)?,
        nominatim: settings.nominatim_endpoint().map_err(std::io::Error::other)?,
        timeout: settings.http_timeout().map_err(std::io::Error::other)?,
        identity: settings.identity(),
    };
    let origins =
        AllowedOrigins::parse(settings.allowed_origins()).map_err(std::io::Error::other)?;

    Ok(ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr().map_err(std::io::Error::other)?,
        map_services,
    )
    .with_supabase(settings.supabase().map_err(std::io::Error::other)?)
    .with_password_reset_redirect(settings.password_reset_redirect())
    .with_allowed_origins(origins))
}
