//! Map layer: endpoint markers, the route line and incident markers.

use std::collections::BTreeMap;

use geo::{BoundingRect, Coord, LineString};
use route_safety_models::{
    Coordinate, CrimeCategory, CrimeRecord, GeocodedLocation, RouteAnalysis, RouteResult,
};

use crate::format;
use crate::severity::SeverityBand;

/// Colour of the route line.
pub const ROUTE_COLOR: &str = "#4361ee";
/// Colour of the origin marker.
pub const ORIGIN_COLOR: &str = "#3a0ca3";
/// Colour of the destination marker.
pub const DESTINATION_COLOR: &str = "#f72585";
/// Padding around the fitted route, in pixels.
pub const FIT_PADDING_PX: u32 = 50;
/// Radius within which incident markers are clustered, in pixels.
pub const MAX_CLUSTER_RADIUS_PX: u32 = 30;
/// Zoom level of a fitted city route.
pub const STREET_ZOOM: u8 = 14;
/// Side of a map tile, in pixels.
const TILE_SIZE_PX: f64 = 256.0;

/// Which end of the route a marker sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Origin,
    Destination,
}

/// Origin or destination marker.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointMarker {
    pub kind: EndpointKind,
    pub coordinate: Coordinate,
    /// Hover title and popup text, e.g. `From: Harlem`.
    pub title: String,
    /// The geocoder's name for the matched place, if it gave one.
    pub display_name: Option<String>,
    pub color: &'static str,
}

impl EndpointMarker {
    fn new(kind: EndpointKind, location: &GeocodedLocation) -> Self {
        let (prefix, color) = match kind {
            EndpointKind::Origin => ("From", ORIGIN_COLOR),
            EndpointKind::Destination => ("To", DESTINATION_COLOR),
        };
        Self {
            kind,
            coordinate: location.coordinate,
            title: format!("{prefix}: {}", location.query),
            display_name: location.display_name.clone(),
            color,
        }
    }
}

/// Stroke style of a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: &'static str,
    pub weight: u32,
    pub opacity: f64,
    /// Dash pattern; `None` for a solid line.
    pub dash_array: Option<&'static str>,
}

impl LineStyle {
    /// Solid style for a routing-service path.
    pub const DETAILED: Self = Self {
        color: ROUTE_COLOR,
        weight: 5,
        opacity: 0.9,
        dash_array: None,
    };

    /// Dashed style for the straight-line fallback.
    pub const FALLBACK: Self = Self {
        color: ROUTE_COLOR,
        weight: 5,
        opacity: 0.7,
        dash_array: Some("10, 10"),
    };
}

/// The drawn route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLine {
    pub path: Vec<Coordinate>,
    pub style: LineStyle,
    pub fallback: bool,
}

impl From<&RouteResult> for RouteLine {
    fn from(route: &RouteResult) -> Self {
        Self {
            path: route.path().to_vec(),
            style: if route.is_fallback() {
                LineStyle::FALLBACK
            } else {
                LineStyle::DETAILED
            },
            fallback: route.is_fallback(),
        }
    }
}

/// Popup content of an incident marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    /// Heading (the crime type).
    pub title: String,
    /// `(label, value)` rows in display order.
    pub rows: Vec<(&'static str, String)>,
}

/// A single incident on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentMarker {
    pub coordinate: Coordinate,
    pub category: CrimeCategory,
    /// Text inside the marker (the severity).
    pub label: String,
    /// Hover title (the crime type).
    pub title: String,
    /// `violent-marker` or `property-marker`.
    pub marker_class: &'static str,
    pub band: SeverityBand,
    pub popup: Popup,
}

impl From<&CrimeRecord> for IncidentMarker {
    fn from(crime: &CrimeRecord) -> Self {
        let band = SeverityBand::from_severity(crime.severity);

        let mut rows = vec![
            ("Date", crime.date.clone()),
            ("Time", format!("{} ({})", crime.time, crime.time_of_day)),
            (
                "Location",
                format!(
                    "{}, {}, {}",
                    crime.street_address, crime.neighborhood, crime.borough
                ),
            ),
            ("Category", crime.category.to_string()),
            ("Status", crime.status.clone()),
            ("Severity", format!("{}/10 ({band})", crime.severity)),
        ];
        if crime.victims > 0 {
            rows.push(("Victims", crime.victims.to_string()));
        }
        if crime.property_damage > 0 {
            rows.push(("Property Damage", format::dollars(crime.property_damage)));
        }

        Self {
            coordinate: crime.coordinate(),
            category: crime.category,
            label: crime.severity.to_string(),
            title: crime.crime_type.clone(),
            marker_class: match crime.category {
                CrimeCategory::Violent => "violent-marker",
                CrimeCategory::Property => "property-marker",
            },
            band,
            popup: Popup {
                title: crime.crime_type.clone(),
                rows,
            },
        }
    }
}

/// Size class of a cluster icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClusterSize {
    Small,
    Medium,
    Large,
}

impl ClusterSize {
    /// Size class for a cluster of `count` markers.
    #[must_use]
    pub const fn for_count(count: usize) -> Self {
        if count > 20 {
            Self::Large
        } else if count > 10 {
            Self::Medium
        } else {
            Self::Small
        }
    }

    /// Style class of the cluster icon.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Small => "cluster-small",
            Self::Medium => "cluster-medium",
            Self::Large => "cluster-large",
        }
    }
}

/// Markers grouped into one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentCluster {
    /// Mean position of the members.
    pub center: Coordinate,
    /// Indexes into [`IncidentLayer::markers`].
    pub members: Vec<usize>,
    pub size: ClusterSize,
}

/// Clustered incident markers.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentLayer {
    pub markers: Vec<IncidentMarker>,
    pub max_cluster_radius_px: u32,
}

impl Default for IncidentLayer {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
            max_cluster_radius_px: MAX_CLUSTER_RADIUS_PX,
        }
    }
}

impl IncidentLayer {
    /// Width in degrees of longitude that `max_cluster_radius_px` spans at
    /// `zoom`, measured at the equator. Passing this to [`Self::clusters`]
    /// groups markers that would overlap on screen.
    #[must_use]
    pub fn cluster_cell_degrees(&self, zoom: u8) -> f64 {
        f64::from(self.max_cluster_radius_px) * 360.0
            / (TILE_SIZE_PX * 2_f64.powi(i32::from(zoom)))
    }

    /// Groups markers into square grid cells `cell_degrees` wide.
    ///
    /// Clusters are ordered by grid cell, south-west first. A
    /// non-positive cell size puts every marker in its own cluster.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn clusters(&self, cell_degrees: f64) -> Vec<IncidentCluster> {
        if cell_degrees <= 0.0 {
            return self
                .markers
                .iter()
                .enumerate()
                .map(|(i, marker)| IncidentCluster {
                    center: marker.coordinate,
                    members: vec![i],
                    size: ClusterSize::Small,
                })
                .collect();
        }

        let mut cells: BTreeMap<(i64, i64), Vec<usize>> = BTreeMap::new();
        for (i, marker) in self.markers.iter().enumerate() {
            let key = (
                (marker.coordinate.latitude / cell_degrees).floor() as i64,
                (marker.coordinate.longitude / cell_degrees).floor() as i64,
            );
            cells.entry(key).or_default().push(i);
        }

        cells
            .into_values()
            .map(|members| {
                let n = members.len() as f64;
                let (lat, lng) = members.iter().fold((0.0, 0.0), |(lat, lng), &i| {
                    let c = self.markers[i].coordinate;
                    (lat + c.latitude, lng + c.longitude)
                });
                IncidentCluster {
                    center: Coordinate::new(lat / n, lng / n),
                    size: ClusterSize::for_count(members.len()),
                    members,
                }
            })
            .collect()
    }
}

/// Axis-aligned bounds of a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    /// Bounds of `points`, or `None` when empty.
    #[must_use]
    pub fn of(points: &[Coordinate]) -> Option<Self> {
        let line: LineString<f64> = points
            .iter()
            .map(|c| Coord {
                x: c.longitude,
                y: c.latitude,
            })
            .collect::<Vec<_>>()
            .into();
        let rect = line.bounding_rect()?;
        Some(Self {
            south_west: Coordinate::new(rect.min().y, rect.min().x),
            north_east: Coordinate::new(rect.max().y, rect.max().x),
        })
    }
}

/// Region the map should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub bounds: Bounds,
    pub padding_px: u32,
}

/// Everything drawn on the map for one analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapLayer {
    pub origin: Option<EndpointMarker>,
    pub destination: Option<EndpointMarker>,
    pub route_line: Option<RouteLine>,
    pub incidents: IncidentLayer,
    pub viewport: Option<Viewport>,
}

impl MapLayer {
    /// Builds the map layer for an analysis.
    #[must_use]
    pub fn for_analysis(analysis: &RouteAnalysis) -> Self {
        let route_line = RouteLine::from(&analysis.route);
        let viewport = Bounds::of(&route_line.path).map(|bounds| Viewport {
            bounds,
            padding_px: FIT_PADDING_PX,
        });

        Self {
            origin: Some(EndpointMarker::new(EndpointKind::Origin, &analysis.origin)),
            destination: Some(EndpointMarker::new(
                EndpointKind::Destination,
                &analysis.destination,
            )),
            route_line: Some(route_line),
            incidents: IncidentLayer {
                markers: analysis
                    .result
                    .crimes
                    .iter()
                    .map(IncidentMarker::from)
                    .collect(),
                ..IncidentLayer::default()
            },
            viewport,
        }
    }

    /// Whether nothing is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.origin.is_none()
            && self.destination.is_none()
            && self.route_line.is_none()
            && self.incidents.markers.is_empty()
    }
}
