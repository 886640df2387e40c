//! Builders for the HTTP and WebSocket state ports.
//!
//! Map lookups always use the Overpass and Nominatim adapters. Accounts and
//! parking records use Supabase when configured and in-memory fixtures
//! otherwise.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use spark_backend::domain::ports::{
    AccountCommand, AuthProvider, FixtureAuthProvider, FixtureParkingRecordsRepository,
    FixtureUserProfileRepository, NearbyParkingQuery, ParkingRecordsCommand,
    ParkingRecordsRepository, UserProfileRepository,
};
use spark_backend::domain::{AccountService, NearbyParkingService, ParkingRecordsService};
use spark_backend::inbound::http::state::HttpState;
use spark_backend::inbound::ws::state::WsState;
use spark_backend::outbound::nominatim::NominatimHttpGeocoder;
use spark_backend::outbound::overpass::OverpassHttpSource;
use spark_backend::outbound::supabase::{
    SupabaseAuthProvider, SupabaseClient, SupabaseConfig, SupabaseRestRepository,
};

use super::{MapServices, ServerConfig};

type AccountPorts = (Arc<dyn AccountCommand>, Arc<dyn ParkingRecordsCommand>);

/// Build the nearby-parking service over the public map services.
///
/// # Errors
/// Returns [`std::io::Error`] when an HTTP client cannot be constructed.
pub(crate) fn build_nearby_service(
    map: &MapServices,
) -> std::io::Result<Arc<dyn NearbyParkingQuery>> {
    let source = OverpassHttpSource::new(map.overpass.clone(), map.timeout, map.identity.clone())
        .map_err(std::io::Error::other)?;
    let geocoder =
        NominatimHttpGeocoder::new(map.nominatim.clone(), map.timeout, map.identity.clone())
            .map_err(std::io::Error::other)?;
    Ok(Arc::new(NearbyParkingService::new(
        Arc::new(source),
        Arc::new(geocoder),
    )))
}

fn assemble_account_ports<A, P, R>(
    auth: Arc<A>,
    profiles: Arc<P>,
    records: Arc<R>,
    redirect: Option<String>,
) -> AccountPorts
where
    A: AuthProvider + 'static,
    P: UserProfileRepository + 'static,
    R: ParkingRecordsRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    (
        Arc::new(AccountService::new(auth, profiles).with_password_reset_redirect(redirect)),
        Arc::new(ParkingRecordsService::new(records, clock)),
    )
}

fn build_account_ports_with(
    supabase: Option<&SupabaseConfig>,
    redirect: Option<String>,
) -> std::io::Result<AccountPorts> {
    match supabase {
        Some(config) => {
            let client =
                Arc::new(SupabaseClient::new(config.clone()).map_err(std::io::Error::other)?);
            let rest = Arc::new(SupabaseRestRepository::new(Arc::clone(&client)));
            info!(url = %config.url, "using Supabase for accounts and parking records");
            Ok(assemble_account_ports(
                Arc::new(SupabaseAuthProvider::new(client)),
                Arc::clone(&rest),
                rest,
                redirect,
            ))
        }
        None => {
            warn!("Supabase not configured; accounts and records are in-memory fixtures");
            Ok(assemble_account_ports(
                Arc::new(FixtureAuthProvider::default()),
                Arc::new(FixtureUserProfileRepository),
                Arc::new(FixtureParkingRecordsRepository),
                redirect,
            ))
        }
    }
}

/// Build the shared HTTP and WebSocket state from configured ports.
///
/// # Errors
/// Returns [`std::io::Error`] when an outbound client cannot be constructed.
pub(super) fn build_states(
    config: &ServerConfig,
) -> std::io::Result<(web::Data<HttpState>, web::Data<WsState>)> {
    let nearby = build_nearby_service(&config.map_services)?;
    let (accounts, records) = build_account_ports_with(
        config.supabase.as_ref(),
        config.password_reset_redirect.clone(),
    )?;

    let http_state = web::Data::new(HttpState::new(Arc::clone(&nearby), accounts, records));
    let ws_state = web::Data::new(WsState::new(nearby, config.allowed_origins.clone()));
    Ok((http_state, ws_state))
}
