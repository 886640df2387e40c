//! Parking candidates and the nearby-ranking rules.
//!
//! A [`ParkingPoi`] is what the POI source returns; a [`ParkingSpot`] is the
//! same place measured against the user's position. Spots are ephemeral and
//! recomputed on every refresh.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::geo::{Coordinate, GeocodedPlace, estimated_minutes};

/// Default search radius around the user's position, in metres.
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 1000.0;
/// Largest radius accepted for one lookup, in metres.
pub const MAX_SEARCH_RADIUS_M: f64 = 5000.0;
/// Upper bound on the number of spots returned by one refresh.
pub const MAX_NEARBY_RESULTS: usize = 30;
/// Display name used when a POI carries neither `name` nor `operator`.
pub const FALLBACK_PARKING_NAME: &str = "Parking";

const PARKING_ID_MAX: usize = 64;

/// Validation errors for parking values.
#[derive(Debug, Clone, PartialEq)]
pub enum ParkingValidationError {
    EmptyId,
    IdTooLong { max: usize },
    EmptyName,
    InvalidDistance { value: f64 },
    RadiusOutOfRange { value: f64, max: f64 },
}

impl fmt::Display for ParkingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "parking id must not be empty"),
            Self::IdTooLong { max } => write!(f, "parking id must be at most {max} characters"),
            Self::EmptyName => write!(f, "parking name must not be empty"),
            Self::InvalidDistance { value } => {
                write!(f, "distance must be a finite, non-negative number, got {value}")
            }
            Self::RadiusOutOfRange { value, max } => {
                write!(f, "radius must be greater than 0 and at most {max} metres, got {value}")
            }
        }
    }
}

impl std::error::Error for ParkingValidationError {}

/// Identifier of a parking place, `<element type>/<osm id>` for OSM data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParkingSpotId(String);

impl ParkingSpotId {
    /// Validate and construct an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, ParkingValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ParkingValidationError::EmptyId);
        }
        if trimmed.chars().count() > PARKING_ID_MAX {
            return Err(ParkingValidationError::IdTooLong {
                max: PARKING_ID_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Identifier for an OSM element such as `node/42`.
    pub fn from_osm(element_type: &str, element_id: i64) -> Self {
        Self(format!("{element_type}/{element_id}"))
    }
}

impl AsRef<str> for ParkingSpotId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ParkingSpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ParkingSpotId> for String {
    fn from(value: ParkingSpotId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ParkingSpotId {
    type Error = ParkingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Search radius in metres.
///
/// ## Invariants
/// - finite, greater than zero, at most [`MAX_SEARCH_RADIUS_M`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRadius(f64);

impl SearchRadius {
    /// Validate and construct a radius.
    pub fn new(meters: f64) -> Result<Self, ParkingValidationError> {
        if !meters.is_finite() || meters <= 0.0 || meters > MAX_SEARCH_RADIUS_M {
            return Err(ParkingValidationError::RadiusOutOfRange {
                value: meters,
                max: MAX_SEARCH_RADIUS_M,
            });
        }
        Ok(Self(meters))
    }

    /// Radius from an optional client value, defaulting to
    /// [`DEFAULT_SEARCH_RADIUS_M`].
    pub fn from_optional(meters: Option<f64>) -> Result<Self, ParkingValidationError> {
        meters.map_or(Ok(Self::default()), Self::new)
    }

    /// Radius in metres.
    pub fn meters(&self) -> f64 {
        self.0
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self(DEFAULT_SEARCH_RADIUS_M)
    }
}

/// One parking amenity as reported by the POI source.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingPoi {
    pub id: ParkingSpotId,
    pub name: String,
    pub coordinate: Coordinate,
}

impl ParkingPoi {
    /// Measure this POI against `origin`.
    pub fn measure_from(self, origin: &Coordinate) -> ParkingSpot {
        let distance_m = origin.distance_to(&self.coordinate);
        ParkingSpot {
            id: self.id,
            name: self.name,
            coordinate: self.coordinate,
            distance_m,
        }
    }
}

/// Parking place with its distance from the user's current position.
///
/// ## Invariants
/// - `distance_m` is finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingSpot {
    id: ParkingSpotId,
    name: String,
    coordinate: Coordinate,
    distance_m: f64,
}

impl ParkingSpot {
    /// Build a spot with an already known distance.
    pub fn with_distance(
        id: ParkingSpotId,
        name: impl Into<String>,
        coordinate: Coordinate,
        distance_m: f64,
    ) -> Result<Self, ParkingValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ParkingValidationError::EmptyName);
        }
        if !distance_m.is_finite() || distance_m < 0.0 {
            return Err(ParkingValidationError::InvalidDistance { value: distance_m });
        }
        Ok(Self {
            id,
            name,
            coordinate,
            distance_m,
        })
    }

    pub fn id(&self) -> &ParkingSpotId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// Distance from the origin used for ranking, in metres.
    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    /// Walking estimate to this spot in whole minutes.
    pub fn eta_minutes(&self) -> u32 {
        estimated_minutes(self.distance_m)
    }
}

/// Result of one nearby-parking refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyParking {
    /// Position the spots were measured from.
    pub origin: Coordinate,
    pub radius: SearchRadius,
    /// Spots ordered nearest first, at most [`MAX_NEARBY_RESULTS`].
    pub spots: Vec<ParkingSpot>,
    /// Place matched by a text search; `None` for position lookups.
    pub place: Option<GeocodedPlace>,
}

/// Pick the display name for a POI from its tags.
pub fn parking_display_name(name: Option<&str>, operator: Option<&str>) -> String {
    [name, operator]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(FALLBACK_PARKING_NAME)
        .to_owned()
}

/// Keep spots within `radius`, ordered nearest first, capped at
/// [`MAX_NEARBY_RESULTS`].
///
/// Equal distances are ordered by identifier so repeated refreshes are stable.
pub fn select_nearby(mut spots: Vec<ParkingSpot>, radius: SearchRadius) -> Vec<ParkingSpot> {
    spots.retain(|spot| spot.distance_m <= radius.meters());
    spots.sort_by(|a, b| {
        a.distance_m
            .total_cmp(&b.distance_m)
            .then_with(|| a.id.cmp(&b.id))
    });
    spots.truncate(MAX_NEARBY_RESULTS);
    spots
}

/// Measure `pois` from `origin` and apply [`select_nearby`].
pub fn rank_nearby(
    origin: &Coordinate,
    pois: Vec<ParkingPoi>,
    radius: SearchRadius,
) -> Vec<ParkingSpot> {
    let measured = pois
        .into_iter()
        .map(|poi| poi.measure_from(origin))
        .collect();
    select_nearby(measured, radius)
}

/// Keep spots whose name contains `needle`, ignoring case.
///
/// A blank needle keeps every spot.
pub fn filter_by_name(spots: Vec<ParkingSpot>, needle: &str) -> Vec<ParkingSpot> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return spots;
    }
    spots
        .into_iter()
        .filter(|spot| spot.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::EARTH_RADIUS_M;
    use rstest::rstest;

    fn origin() -> Coordinate {
        Coordinate::new(14.5995, 120.9842).expect("fixture origin")
    }

    fn spot(id: &str, distance_m: f64) -> ParkingSpot {
        ParkingSpot::with_distance(
            ParkingSpotId::new(id).expect("fixture id"),
            format!("Parking Lot {id}"),
            origin(),
            distance_m,
        )
        .expect("fixture spot")
    }

    fn poi_north_of_origin(id: &str, meters: f64) -> ParkingPoi {
        let delta = (meters / EARTH_RADIUS_M).to_degrees();
        ParkingPoi {
            id: ParkingSpotId::new(id).expect("fixture id"),
            name: format!("Lot {id}"),
            coordinate: Coordinate::new(origin().latitude() + delta, origin().longitude())
                .expect("fixture coordinate"),
        }
    }

    fn ids(spots: &[ParkingSpot]) -> Vec<&str> {
        spots.iter().map(|spot| spot.id().as_ref()).collect()
    }

    #[test]
    fn keeps_spots_inside_radius_nearest_first() {
        let spots = vec![spot("c", 1500.0), spot("b", 800.0), spot("a", 50.0)];
        let radius = SearchRadius::new(1000.0).expect("radius");
        let nearby = select_nearby(spots, radius);
        assert_eq!(ids(&nearby), vec!["a", "b"]);
        assert_eq!(nearby[0].distance_m(), 50.0);
        assert_eq!(nearby[1].distance_m(), 800.0);
    }

    #[test]
    fn ranks_raw_pois_by_measured_distance() {
        let pois = vec![
            poi_north_of_origin("node/3", 1500.0),
            poi_north_of_origin("node/2", 800.0),
            poi_north_of_origin("node/1", 50.0),
        ];
        let nearby = rank_nearby(&origin(), pois, SearchRadius::default());
        assert_eq!(ids(&nearby), vec!["node/1", "node/2"]);
        assert!((nearby[0].distance_m() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn truncates_to_result_cap() {
        let spots = (0..75)
            .map(|index| spot(&format!("s{index:03}"), f64::from(index)))
            .collect();
        let nearby = select_nearby(spots, SearchRadius::default());
        assert_eq!(nearby.len(), MAX_NEARBY_RESULTS);
        assert_eq!(nearby[0].id().as_ref(), "s000");
        assert_eq!(nearby[MAX_NEARBY_RESULTS - 1].id().as_ref(), "s029");
    }

    #[test]
    fn spot_on_radius_boundary_is_kept() {
        let nearby = select_nearby(vec![spot("edge", 1000.0)], SearchRadius::default());
        assert_eq!(nearby.len(), 1);
    }

    #[test]
    fn equal_distances_are_ordered_by_id() {
        let nearby = select_nearby(
            vec![spot("b", 10.0), spot("a", 10.0)],
            SearchRadius::default(),
        );
        assert_eq!(ids(&nearby), vec!["a", "b"]);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(5000.5)]
    #[case(f64::NAN)]
    fn rejects_out_of_range_radius(#[case] meters: f64) {
        assert!(SearchRadius::new(meters).is_err());
    }

    #[test]
    fn missing_radius_defaults() {
        let radius = SearchRadius::from_optional(None).expect("default radius");
        assert_eq!(radius.meters(), DEFAULT_SEARCH_RADIUS_M);
    }

    #[rstest]
    #[case(Some("Robinsons Garage"), Some("Robinsons"), "Robinsons Garage")]
    #[case(Some("  "), Some("City Parking Co"), "City Parking Co")]
    #[case(None, None, FALLBACK_PARKING_NAME)]
    fn chooses_display_name(
        #[case] name: Option<&str>,
        #[case] operator: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(parking_display_name(name, operator), expected);
    }

    #[test]
    fn name_filter_ignores_case() {
        let spots = vec![spot("A", 1.0), spot("B", 2.0)];
        let filtered = filter_by_name(spots, "lot a");
        assert_eq!(ids(&filtered), vec!["A"]);
    }

    #[test]
    fn blank_name_filter_keeps_everything() {
        let filtered = filter_by_name(vec![spot("A", 1.0), spot("B", 2.0)], "  ");
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn eta_uses_walking_speed() {
        assert_eq!(spot("A", 601.0).eta_minutes(), 3);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_distance(#[case] distance: f64) {
        let result = ParkingSpot::with_distance(
            ParkingSpotId::new("x").expect("id"),
            "X",
            origin(),
            distance,
        );
        assert!(matches!(
            result,
            Err(ParkingValidationError::InvalidDistance { .. })
        ));
    }
}
