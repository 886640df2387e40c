//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use spark_backend::inbound::ws::state::AllowedOrigins;
use spark_backend::outbound::HttpIdentity;
use spark_backend::outbound::supabase::SupabaseConfig;
use url::Url;

/// Endpoints and client identity for the public map services.
#[derive(Debug, Clone)]
pub struct MapServices {
    pub overpass: Url,
    pub nominatim: Url,
    pub timeout: Duration,
    pub identity: HttpIdentity,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) map_services: MapServices,
    pub(crate) supabase: Option<SupabaseConfig>,
    pub(crate) password_reset_redirect: Option<String>,
    pub(crate) allowed_origins: AllowedOrigins,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        map_services: MapServices,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            map_services,
            supabase: None,
            password_reset_redirect: None,
            allowed_origins: AllowedOrigins::default(),
        }
    }

    /// Use the hosted Supabase project for auth and records.
    ///
    /// Without it the server runs on in-memory fixture adapters.
    #[must_use]
    pub fn with_supabase(mut self, supabase: Option<SupabaseConfig>) -> Self {
        self.supabase = supabase;
        self
    }

    #[must_use]
    pub fn with_password_reset_redirect(mut self, redirect: Option<String>) -> Self {
        self.password_reset_redirect = redirect;
        self
    }

    #[must_use]
    pub fn with_allowed_origins(mut self, origins: AllowedOrigins) -> Self {
        self.allowed_origins = origins;
        self
    }
}
