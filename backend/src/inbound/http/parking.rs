//! Parking API handlers.
//!
//! ```text
//! GET  /api/v1/parking/nearby?lat=14.5995&lng=120.9842&radius=1000&name=sm
//! GET  /api/v1/parking/search?q=SM%20Megamall&radius=800
//! POST /api/v1/parking/saved {"parkingId":"way/42","name":"SM Megamall Parking","latitude":14.5849,"longitude":121.0563}
//! POST /api/v1/parking/history {...same shape...}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{NearbyParkingRequest, ParkingSearchRequest};
use crate::domain::{Error, ParkingSpotId, ParkingSpotRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::NearbyParkingBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    normalise_filter, parking_error, parse_coordinate, parse_radius,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearbyQuery {
    /// Latitude of the search origin.
    pub lat: f64,
    /// Longitude of the search origin.
    pub lng: f64,
    /// Search radius in metres; defaults to 1000.
    pub radius: Option<f64>,
    /// Case-insensitive name filter.
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Free-text place, e.g. a mall or landmark.
    pub q: String,
    pub radius: Option<f64>,
    pub name: Option<String>,
}

/// Parking place the user saved or parked at.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpotRequest {
    #[schema(example = "way/42")]
    pub parking_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ParkingSpotRequest {
    fn into_record(self) -> Result<ParkingSpotRecord, Error> {
        let parking_id = ParkingSpotId::new(self.parking_id).map_err(|err| parking_error(&err))?;
        let coordinate = parse_coordinate(self.latitude, self.longitude)?;
        ParkingSpotRecord::new(parking_id, &self.name, coordinate).map_err(|err| parking_error(&err))
    }
}

/// Parking around a position, nearest first.
#[utoipa::path(
    get,
    path = "/api/v1/parking/nearby",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Nearby parking", body = NearbyParkingBody),
        (status = 400, description = "Invalid position or radius", body = Error),
        (status = 503, description = "Map data unavailable", body = Error)
    ),
    tags = ["parking"],
    operation_id = "nearbyParking"
)]
#[get("/parking/nearby")]
pub async fn nearby(
    state: web::Data<HttpState>,
    query: web::Query<NearbyQuery>,
) -> ApiResult<web::Json<NearbyParkingBody>> {
    let NearbyQuery {
        lat,
        lng,
        radius,
        name,
    } = query.into_inner();
    let request = NearbyParkingRequest {
        origin: parse_coordinate(lat, lng)?,
        radius: parse_radius(radius)?,
        name_filter: normalise_filter(name),
    };
    let result = state.nearby.nearby(&request).await?;
    Ok(web::Json(NearbyParkingBody::from(&result)))
}

/// Parking around a searched place.
#[utoipa::path(
    get,
    path = "/api/v1/parking/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Parking around the matched place", body = NearbyParkingBody),
        (status = 400, description = "Empty query or invalid radius", body = Error),
        (status = 404, description = "No place matched", body = Error),
        (status = 503, description = "Map data unavailable", body = Error)
    ),
    tags = ["parking"],
    operation_id = "searchParking"
)]
#[get("/parking/search")]
pub async fn search(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<NearbyParkingBody>> {
    let SearchQuery { q, radius, name } = query.into_inner();
    let request = ParkingSearchRequest {
        query: q,
        radius: parse_radius(radius)?,
        name_filter: normalise_filter(name),
    };
    let result = state.nearby.search(&request).await?;
    Ok(web::Json(NearbyParkingBody::from(&result)))
}

/// Save a parking place for the signed-in user.
#[utoipa::path(
    post,
    path = "/api/v1/parking/saved",
    request_body = ParkingSpotRequest,
    responses(
        (status = 204, description = "Saved"),
        (status = 400, description = "Invalid parking place", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["parking"],
    operation_id = "saveParkingSpot"
)]
#[post("/parking/saved")]
pub async fn save_spot(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ParkingSpotRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_session()?;
    let record = payload.into_inner().into_record()?;
    state.records.save_spot(&user, record).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Record that the signed-in user parked somewhere.
#[utoipa::path(
    post,
    path = "/api/v1/parking/history",
    request_body = ParkingSpotRequest,
    responses(
        (status = 204, description = "Recorded"),
        (status = 400, description = "Invalid parking place", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["parking"],
    operation_id = "recordParkingVisit"
)]
#[post("/parking/history")]
pub async fn record_visit(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ParkingSpotRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_session()?;
    let record = payload.into_inner().into_record()?;
    state.records.record_visit(&user, record).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "parking_tests.rs"]
mod tests;
