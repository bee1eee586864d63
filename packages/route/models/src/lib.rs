#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data model for route safety analysis.
//!
//! Coordinates, route requests/results, incident records and the
//! aggregate statistics returned by the crime backend. Wire field names
//! match the backend JSON exactly; everything is created fresh per
//! analysis and never persisted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS84 coordinate.
///
/// Serialized as the two-element array `[lat, lng]`, which is the order
/// the crime backend expects for `route_coordinates`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate from a `(longitude, latitude)` pair, the
    /// `GeoJSON` axis order used by routing services.
    #[must_use]
    pub const fn from_lng_lat(longitude: f64, latitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coord: Coordinate) -> Self {
        [coord.latitude, coord.longitude]
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Response body of `GET /api/geocode`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    /// Whether the backend resolved the location.
    pub success: bool,
    /// Latitude, present on success.
    pub lat: Option<f64>,
    /// Longitude, present on success.
    pub lng: Option<f64>,
    /// Canonical name of the matched location.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// An address resolved to a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    /// The address text that was looked up.
    pub query: String,
    /// Resolved position.
    pub coordinate: Coordinate,
    /// Canonical name reported by the geocoder, if any.
    pub display_name: Option<String>,
}

/// The path used for a crime lookup.
///
/// Routing failures are not errors: they produce a [`RouteResult::Fallback`]
/// straight line so callers can't mistake a degraded route for a fatal
/// condition.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResult {
    /// Polyline returned by the routing service, in `(lat, lng)` order.
    Detailed {
        /// Ordered path coordinates.
        path: Vec<Coordinate>,
    },
    /// Straight line between origin and destination.
    Fallback {
        /// `[origin, destination]`.
        path: [Coordinate; 2],
    },
}

impl RouteResult {
    /// Creates the straight-line fallback between two points.
    #[must_use]
    pub const fn straight_line(origin: Coordinate, destination: Coordinate) -> Self {
        Self::Fallback {
            path: [origin, destination],
        }
    }

    /// Returns the ordered path coordinates.
    #[must_use]
    pub fn path(&self) -> &[Coordinate] {
        match self {
            Self::Detailed { path } => path,
            Self::Fallback { path } => path,
        }
    }

    /// Whether this is the straight-line fallback.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// A crime lookup request for `POST /api/crimes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "RouteRequestBody")]
pub struct RouteRequest {
    /// Route start.
    pub origin: Coordinate,
    /// Route end.
    pub destination: Coordinate,
    /// Detailed path, only when the routing service succeeded.
    pub path: Option<Vec<Coordinate>>,
}

impl RouteRequest {
    /// Builds the request for a planned route. The detailed path is only
    /// attached for [`RouteResult::Detailed`].
    #[must_use]
    pub fn for_route(origin: Coordinate, destination: Coordinate, route: &RouteResult) -> Self {
        let path = match route {
            RouteResult::Detailed { path } => Some(path.clone()),
            RouteResult::Fallback { .. } => None,
        };
        Self {
            origin,
            destination,
            path,
        }
    }
}

#[derive(Serialize)]
struct RouteRequestBody {
    from_lat: f64,
    from_lng: f64,
    to_lat: f64,
    to_lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    route_coordinates: Option<Vec<Coordinate>>,
}

impl From<RouteRequest> for RouteRequestBody {
    fn from(req: RouteRequest) -> Self {
        Self {
            from_lat: req.origin.latitude,
            from_lng: req.origin.longitude,
            to_lat: req.destination.latitude,
            to_lng: req.destination.longitude,
            route_coordinates: req.path,
        }
    }
}

/// Incident category as reported by the crime backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum CrimeCategory {
    /// Crimes against persons.
    #[serde(rename = "Violent Crimes")]
    #[strum(serialize = "Violent Crimes")]
    Violent,
    /// Crimes against property.
    #[serde(rename = "Property Crimes")]
    #[strum(serialize = "Property Crimes")]
    Property,
}

/// Backend-computed safety rating of a route.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum SafetyLevel {
    /// Score below 60.
    Low,
    /// Score from 60 up to 80.
    Medium,
    /// Score of 80 or more.
    High,
}

impl SafetyLevel {
    /// Bands a safety score the same way the backend does.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 60.0 {
            Self::Low
        } else if score < 80.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Hex colour used to display the score for this level.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#e63946",
            Self::Medium => "#f8961e",
            Self::High => "#4cc9f0",
        }
    }

    /// Style class for the level badge.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Low => "low-safety",
            Self::Medium => "medium-safety",
            Self::High => "high-safety",
        }
    }

    /// Badge text, e.g. `"Medium Safety"`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{self} Safety")
    }
}

/// A single crime near the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeRecord {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Top-level category.
    pub category: CrimeCategory,
    /// Severity from 1 to 10.
    pub severity: u8,
    /// Specific crime type (e.g. `"Burglary"`).
    #[serde(default)]
    pub crime_type: String,
    /// Date of occurrence, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Time of occurrence, `HH:MM`.
    #[serde(default)]
    pub time: String,
    /// `Morning`, `Afternoon`, `Evening` or `Night`.
    #[serde(default)]
    pub time_of_day: String,
    #[serde(default)]
    pub day_of_week: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub hour: Option<u32>,
    /// Block-level street address.
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub borough: String,
    /// Investigation status.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub victims: u32,
    /// Property damage in whole dollars.
    #[serde(default)]
    pub property_damage: u64,
    /// Distance from the route in kilometres, as computed by the backend.
    #[serde(default)]
    pub distance_to_route: Option<f64>,
}

impl CrimeRecord {
    /// Position of the incident.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Parsed occurrence date, if the backend sent a valid one.
    #[must_use]
    pub fn occurred_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Aggregate statistics for the crimes near a route.
///
/// The backend sends an empty object when no crimes matched; every field
/// defaults so partial objects still decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrimeStats {
    /// Count per crime type.
    pub crime_types: BTreeMap<String, u64>,
    /// Count per category name (`"Violent Crimes"`, `"Property Crimes"`).
    pub crime_categories: BTreeMap<String, u64>,
    pub time_of_day: BTreeMap<String, u64>,
    pub day_of_week: BTreeMap<String, u64>,
    pub year_counts: BTreeMap<String, u64>,
    pub neighborhood_counts: BTreeMap<String, u64>,
    pub status_counts: BTreeMap<String, u64>,
    /// Mean severity of the matched crimes.
    pub avg_severity: f64,
    pub total_victims: u64,
    /// Total property damage in whole dollars.
    pub total_property_damage: u64,
}

impl CrimeStats {
    /// Number of crimes in `category`, zero when absent.
    #[must_use]
    pub fn category_count(&self, category: CrimeCategory) -> u64 {
        self.crime_categories
            .get(category.as_ref())
            .copied()
            .unwrap_or(0)
    }

    /// The `limit` most frequent crime types, most frequent first. Ties are
    /// ordered by name.
    #[must_use]
    pub fn top_crime_types(&self, limit: usize) -> Vec<(String, u64)> {
        top_counts(&self.crime_types, limit)
    }
}

/// Returns the `limit` largest entries of a count map, largest first,
/// ties broken by key.
#[must_use]
pub fn top_counts(counts: &BTreeMap<String, u64>, limit: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = counts
        .iter()
        .map(|(name, count)| (name.clone(), *count))
        .collect();
    // BTreeMap iteration is already key-ordered, so a stable sort keeps
    // ties alphabetical.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(limit);
    entries
}

/// Response body of `POST /api/crimes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Numeric safety score (0-100).
    pub safety_score: f64,
    /// Banded safety level.
    pub safety_level: SafetyLevel,
    /// Crimes near the route, in backend order.
    #[serde(default)]
    pub crimes: Vec<CrimeRecord>,
    /// Aggregate statistics. `None` when missing, `null` or `{}`.
    #[serde(
        default,
        deserialize_with = "empty_object_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub crime_stats: Option<CrimeStats>,
}

impl AnalysisResult {
    /// Whether the reported level agrees with the score banding.
    #[must_use]
    pub fn level_matches_score(&self) -> bool {
        SafetyLevel::from_score(self.safety_score) == self.safety_level
    }
}

fn empty_object_as_none<'de, D>(deserializer: D) -> Result<Option<CrimeStats>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// A monthly bucket in the dashboard time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Month as `YYYY-MM`.
    pub date: String,
    pub count: u64,
}

impl TimeSeriesPoint {
    /// First day of the bucket's month, if `date` parses.
    #[must_use]
    pub fn period_start(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&format!("{}-01", self.date), "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&self.date, "%Y-%m-%d"))
            .ok()
    }
}

/// Crime count for one neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborhoodCount {
    #[serde(rename = "BOROUGH")]
    pub borough: String,
    #[serde(rename = "NEIGHBORHOOD")]
    pub neighborhood: String,
    pub count: u64,
}

/// Response body of `GET /api/data-summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSummary {
    pub total_crimes: u64,
    pub violent_crimes: u64,
    pub property_crimes: u64,
    /// Monthly counts, in no guaranteed order.
    pub time_series_data: Vec<TimeSeriesPoint>,
    pub crime_type_counts: BTreeMap<String, u64>,
    pub time_of_day_counts: BTreeMap<String, u64>,
    pub borough_counts: BTreeMap<String, u64>,
    pub year_counts: BTreeMap<String, u64>,
    pub day_of_week_counts: BTreeMap<String, u64>,
    pub avg_severity: f64,
    pub total_victims: u64,
    pub total_property_damage: u64,
    pub neighborhood_data: Vec<NeighborhoodCount>,
}

/// Everything one route analysis produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAnalysis {
    /// Resolved starting location.
    pub origin: GeocodedLocation,
    /// Resolved destination.
    pub destination: GeocodedLocation,
    /// The path the crime lookup was made for.
    pub route: RouteResult,
    /// Backend analysis for that path.
    pub result: AnalysisResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_serializes_lat_first() {
        let value = serde_json::to_value(Coordinate::new(40.0, -74.0)).unwrap();
        assert_eq!(value, serde_json::json!([40.0, -74.0]));
    }

    #[test]
    fn from_lng_lat_swaps_axes() {
        let coord = Coordinate::from_lng_lat(-74.05, 40.05);
        assert!((coord.latitude - 40.05).abs() < f64::EPSILON);
        assert!((coord.longitude - -74.05).abs() < f64::EPSILON);
    }

    #[test]
    fn fallback_route_is_two_points() {
        let a = Coordinate::new(40.0, -74.0);
        let b = Coordinate::new(40.1, -74.1);
        let route = RouteResult::straight_line(a, b);
        assert!(route.is_fallback());
        assert_eq!(route.path(), &[a, b]);
    }

    #[test]
    fn request_body_includes_detailed_path() {
        let a = Coordinate::new(40.0, -74.0);
        let b = Coordinate::new(40.1, -74.1);
        let route = RouteResult::Detailed {
            path: vec![a, Coordinate::new(40.05, -74.05), b],
        };
        let body = serde_json::to_value(RouteRequest::for_route(a, b, &route)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "from_lat": 40.0,
                "from_lng": -74.0,
                "to_lat": 40.1,
                "to_lng": -74.1,
                "route_coordinates": [[40.0, -74.0], [40.05, -74.05], [40.1, -74.1]],
            })
        );
    }

    #[test]
    fn request_body_omits_path_for_fallback() {
        let a = Coordinate::new(40.0, -74.0);
        let b = Coordinate::new(40.1, -74.1);
        let route = RouteResult::straight_line(a, b);
        let body = serde_json::to_value(RouteRequest::for_route(a, b, &route)).unwrap();
        assert!(body.get("route_coordinates").is_none());
        assert_eq!(body["to_lng"], serde_json::json!(-74.1));
    }

    #[test]
    fn empty_crime_stats_decode_as_none() {
        let body = serde_json::json!({
            "safety_score": 100,
            "safety_level": "High",
            "crimes": [],
            "crime_stats": {}
        });
        let result: AnalysisResult = serde_json::from_value(body).unwrap();
        assert!(result.crime_stats.is_none());
        assert!(result.crimes.is_empty());

        let body = serde_json::json!({ "safety_score": 100, "safety_level": "High" });
        let result: AnalysisResult = serde_json::from_value(body).unwrap();
        assert!(result.crime_stats.is_none());
    }

    #[test]
    fn decodes_crime_record_and_stats() {
        let body = serde_json::json!({
            "safety_score": 62.5,
            "safety_level": "Medium",
            "crimes": [{
                "id": 10042,
                "latitude": 40.05,
                "longitude": -74.05,
                "date": "2023-04-12",
                "time": "22:15",
                "borough": "Manhattan",
                "neighborhood": "Chelsea",
                "category": "Violent Crimes",
                "crime_type": "Robbery",
                "severity": 8,
                "victims": 1,
                "property_damage": 0,
                "street_address": "12 5th Ave",
                "status": "Under Investigation",
                "time_of_day": "Night",
                "distance_to_route": 0.12
            }],
            "crime_stats": {
                "crime_types": { "Robbery": 1 },
                "crime_categories": { "Violent Crimes": 1 },
                "avg_severity": 8.0,
                "total_victims": 1,
                "total_property_damage": 0
            }
        });
        let result: AnalysisResult = serde_json::from_value(body).unwrap();
        let crime = &result.crimes[0];
        assert_eq!(crime.category, CrimeCategory::Violent);
        assert_eq!(crime.severity, 8);
        assert_eq!(
            crime.occurred_on(),
            NaiveDate::from_ymd_opt(2023, 4, 12)
        );
        let stats = result.crime_stats.unwrap();
        assert_eq!(stats.category_count(CrimeCategory::Violent), 1);
        assert_eq!(stats.category_count(CrimeCategory::Property), 0);
        assert!(stats.status_counts.is_empty());
    }

    #[test]
    fn safety_level_banding() {
        assert_eq!(SafetyLevel::from_score(59.9), SafetyLevel::Low);
        assert_eq!(SafetyLevel::from_score(60.0), SafetyLevel::Medium);
        assert_eq!(SafetyLevel::from_score(79.0), SafetyLevel::Medium);
        assert_eq!(SafetyLevel::from_score(80.0), SafetyLevel::High);
        assert_eq!(SafetyLevel::Medium.label(), "Medium Safety");
        assert_eq!(SafetyLevel::Low.color(), "#e63946");
    }

    #[test]
    fn top_counts_breaks_ties_by_name() {
        let counts: BTreeMap<String, u64> = [("Theft", 3), ("Assault", 3), ("Arson", 1)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(
            top_counts(&counts, 2),
            vec![("Assault".to_string(), 3), ("Theft".to_string(), 3)]
        );
    }

    #[test]
    fn time_series_period_start() {
        let point = TimeSeriesPoint {
            date: "2022-07".to_string(),
            count: 4,
        };
        assert_eq!(point.period_start(), NaiveDate::from_ymd_opt(2022, 7, 1));
    }
}
