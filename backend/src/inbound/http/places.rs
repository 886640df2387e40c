//! Place lookups.
//!
//! ```text
//! GET /api/v1/places/reverse?lat=14.5995&lng=120.9842
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_coordinate;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceNameResponse {
    #[schema(example = "Rizal Park, Ermita, Manila")]
    pub display_name: String,
}

/// Human-readable description of a position, shown as "current location".
#[utoipa::path(
    get,
    path = "/api/v1/places/reverse",
    params(ReverseQuery),
    responses(
        (status = 200, description = "Place name", body = PlaceNameResponse),
        (status = 400, description = "Invalid position", body = Error),
        (status = 404, description = "Nothing known at this position", body = Error),
        (status = 503, description = "Geocoder unavailable", body = Error)
    ),
    tags = ["places"],
    operation_id = "reverseGeocode"
)]
#[get("/places/reverse")]
pub async fn reverse(
    state: web::Data<HttpState>,
    query: web::Query<ReverseQuery>,
) -> ApiResult<web::Json<PlaceNameResponse>> {
    let position = parse_coordinate(query.lat, query.lng)?;
    let display_name = state.nearby.describe_position(&position).await?;
    Ok(web::Json(PlaceNameResponse { display_name }))
}
