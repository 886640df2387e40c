//! Print the parking spots near a position or a searched place.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use spark_backend::domain::ports::{
    NearbyParkingQuery, NearbyParkingRequest, ParkingSearchRequest,
};
use spark_backend::domain::{Coordinate, NearbyParking, NearbyParkingService, SearchRadius};
use spark_backend::outbound::HttpIdentity;
use spark_backend::outbound::nominatim::NominatimHttpGeocoder;
use spark_backend::outbound::overpass::OverpassHttpSource;
use spark_backend::settings::{
    DEFAULT_HTTP_TIMEOUT_SECONDS, DEFAULT_NOMINATIM_ENDPOINT, DEFAULT_OVERPASS_ENDPOINT,
};
use tokio::runtime::Builder;
use url::Url;

/// `spark-nearby` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "spark-nearby",
    about = "List parking near a position or a searched place, nearest first",
    version
)]
struct CliArgs {
    /// Position as `lat,lng`.
    #[arg(
        long = "at",
        value_name = "lat,lng",
        value_parser = parse_position,
        allow_hyphen_values = true,
        required_unless_present = "query",
        conflicts_with = "query"
    )]
    at: Option<Coordinate>,
    /// Place to geocode instead of a position.
    #[arg(long, value_name = "text")]
    query: Option<String>,
    /// Search radius in metres.
    #[arg(long, value_name = "meters")]
    radius: Option<f64>,
    /// Keep only spots whose name contains this text.
    #[arg(long, value_name = "text")]
    name: Option<String>,
    #[arg(long = "overpass-endpoint", value_name = "url", default_value = DEFAULT_OVERPASS_ENDPOINT)]
    overpass_endpoint: Url,
    #[arg(long = "nominatim-endpoint", value_name = "url", default_value = DEFAULT_NOMINATIM_ENDPOINT)]
    nominatim_endpoint: Url,
    #[arg(long = "timeout-seconds", value_name = "seconds", default_value_t = DEFAULT_HTTP_TIMEOUT_SECONDS)]
    timeout_seconds: u64,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let timeout = Duration::from_secs(args.timeout_seconds.max(1));
    let identity = HttpIdentity::default();

    let source = OverpassHttpSource::new(args.overpass_endpoint, timeout, identity.clone())
        .map_err(|error| io::Error::other(format!("create Overpass client: {error}")))?;
    let geocoder = NominatimHttpGeocoder::new(args.nominatim_endpoint, timeout, identity)
        .map_err(|error| io::Error::other(format!("create Nominatim client: {error}")))?;
    let service = NearbyParkingService::new(Arc::new(source), Arc::new(geocoder));

    let radius = SearchRadius::from_optional(args.radius)
        .map_err(|error| io::Error::other(format!("invalid radius: {error}")))?;
    let name_filter = args.name.filter(|name| !name.trim().is_empty());

    let result = match (args.query, args.at) {
        (Some(query), _) => {
            service
                .search(&ParkingSearchRequest {
                    query,
                    radius,
                    name_filter,
                })
                .await
        }
        (None, Some(origin)) => {
            service
                .nearby(&NearbyParkingRequest {
                    origin,
                    radius,
                    name_filter,
                })
                .await
        }
        (None, None) => return Err(io::Error::other("either --at or --query is required")),
    }
    .map_err(|error| io::Error::other(format!("parking lookup failed: {error}")))?;

    print!("{}", render(&result));
    Ok(())
}

fn parse_position(raw: &str) -> Result<Coordinate, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| "position must be `lat,lng`".to_owned())?;
    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|error| format!("failed to parse position value: {error}"))
    };
    Coordinate::new(parse(lat)?, parse(lng)?).map_err(|error| error.to_string())
}

fn render(result: &NearbyParking) -> String {
    let mut out = String::new();
    if let Some(place) = &result.place {
        out.push_str(&format!("place={}\n", place.display_name));
    }
    out.push_str(&format!(
        "origin={},{} radius_m={}\n",
        result.origin.latitude(),
        result.origin.longitude(),
        result.radius.meters()
    ));
    if result.spots.is_empty() {
        out.push_str("no parking found\n");
    }
    for (rank, spot) in result.spots.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {} [{}] {:.0} m, {} min walk\n",
            rank + 1,
            spot.name(),
            spot.id(),
            spot.distance_m(),
            spot.eta_minutes()
        ));
    }
    out
}
