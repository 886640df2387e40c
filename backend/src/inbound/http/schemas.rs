//! Wire representations of parking results.
//!
//! Shared by the REST handlers and the WebSocket `parkingUpdated` message so
//! both transports serialise a spot the same way. Domain types stay free of
//! framework derives; the conversions live here.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Coordinate, GeocodedPlace, NearbyParking, ParkingSpot};

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateBody {
    #[schema(example = 14.5995)]
    pub latitude: f64,
    #[schema(example = 120.9842)]
    pub longitude: f64,
}

impl From<&Coordinate> for CoordinateBody {
    fn from(value: &Coordinate) -> Self {
        Self {
            latitude: value.latitude(),
            longitude: value.longitude(),
        }
    }
}

/// One parking place with its distance from the search origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpotBody {
    #[schema(example = "way/123456")]
    pub id: String,
    #[schema(example = "SM Megamall Parking")]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Great-circle distance, rounded to whole metres.
    #[schema(example = 420)]
    pub distance_meters: u32,
    /// Walking estimate in whole minutes, never below one.
    #[schema(example = 2)]
    pub eta_minutes: u32,
}

impl From<&ParkingSpot> for ParkingSpotBody {
    fn from(spot: &ParkingSpot) -> Self {
        Self {
            id: spot.id().to_string(),
            name: spot.name().to_owned(),
            latitude: spot.coordinate().latitude(),
            longitude: spot.coordinate().longitude(),
            // Float-to-int `as` saturates; distances are bounded by the radius.
            distance_meters: spot.distance_m().round() as u32,
            eta_minutes: spot.eta_minutes(),
        }
    }
}

/// Place resolved from a free-text search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBody {
    #[schema(example = "SM Megamall, Ortigas Center, Mandaluyong")]
    pub display_name: String,
    pub coordinate: CoordinateBody,
}

impl From<&GeocodedPlace> for PlaceBody {
    fn from(place: &GeocodedPlace) -> Self {
        Self {
            display_name: place.display_name.clone(),
            coordinate: CoordinateBody::from(&place.coordinate),
        }
    }
}

/// Ranked parking around an origin, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyParkingBody {
    pub origin: CoordinateBody,
    pub radius_meters: f64,
    pub spots: Vec<ParkingSpotBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<PlaceBody>,
}

impl From<&NearbyParking> for NearbyParkingBody {
    fn from(value: &NearbyParking) -> Self {
        Self {
            origin: CoordinateBody::from(&value.origin),
            radius_meters: value.radius.meters(),
            spots: value.spots.iter().map(ParkingSpotBody::from).collect(),
            place: value.place.as_ref().map(PlaceBody::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParkingSpotId, SearchRadius};

    fn manila() -> Coordinate {
        Coordinate::new(14.5995, 120.9842).expect("coordinate")
    }

    #[test]
    fn nearby_parking_serialises_in_camel_case() {
        let spot = ParkingSpot::with_distance(
            ParkingSpotId::from_osm("node", 7),
            "Lot A",
            manila(),
            419.6,
        )
        .expect("spot");
        let body = NearbyParkingBody::from(&NearbyParking {
            origin: manila(),
            radius: SearchRadius::default(),
            spots: vec![spot],
            place: None,
        });

        insta::assert_json_snapshot!(body, @r###"
        {
          "origin": {
            "latitude": 14.5995,
            "longitude": 120.9842
          },
          "radiusMeters": 1000.0,
          "spots": [
            {
              "id": "node/7",
              "name": "Lot A",
              "latitude": 14.5995,
              "longitude": 120.9842,
              "distanceMeters": 420,
              "etaMinutes": 2
            }
          ]
        }
        "###);
    }
}
