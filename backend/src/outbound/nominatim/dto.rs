//! DTOs for decoding Nominatim `jsonv2` responses.

use serde::Deserialize;

use crate::domain::{Coordinate, GeocodedPlace};

/// One forward-search hit. Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
pub(super) struct SearchHitDto {
    pub(super) lat: String,
    pub(super) lon: String,
    pub(super) display_name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReverseDto {
    pub(super) display_name: Option<String>,
    pub(super) error: Option<String>,
}

impl SearchHitDto {
    pub(super) fn into_place(self) -> Result<GeocodedPlace, String> {
        let latitude = parse_degrees("lat", &self.lat)?;
        let longitude = parse_degrees("lon", &self.lon)?;
        let coordinate = Coordinate::new(latitude, longitude).map_err(|err| err.to_string())?;
        Ok(GeocodedPlace {
            display_name: self.display_name,
            coordinate,
        })
    }
}

impl ReverseDto {
    /// `None` when Nominatim reports no match.
    pub(super) fn into_display_name(self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        self.display_name.filter(|name| !name.trim().is_empty())
    }
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|err| format!("{field} is not a number ({raw:?}): {err}"))
}
