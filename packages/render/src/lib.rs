#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View model for route safety results.
//!
//! [`Renderer`] turns a [`RouteAnalysis`] or a [`DataSummary`] into a
//! [`ViewState`]: map markers, the route line, clustered incident
//! markers, the results panel and the dashboard charts. The state is
//! replaced wholesale on every call; front ends only read it.

pub mod charts;
pub mod format;
pub mod map;
pub mod panel;
pub mod severity;

use route_safety_models::{DataSummary, RouteAnalysis};

use crate::charts::Dashboard;
use crate::map::MapLayer;
use crate::panel::{ResultsPanel, SummaryPanel};

/// City-wide summary panel and charts.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub summary: SummaryPanel,
    pub charts: Dashboard,
}

/// Everything currently on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub map: MapLayer,
    /// Results of the last analysis, if any.
    pub results: Option<ResultsPanel>,
    /// The city dashboard, once loaded.
    pub dashboard: Option<DashboardView>,
}

/// Owns the current [`ViewState`].
#[derive(Debug, Default)]
pub struct Renderer {
    view: ViewState,
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current view.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Clears the map and results ahead of a new analysis. The dashboard
    /// is kept.
    pub fn begin_analysis(&mut self) {
        self.view = ViewState {
            map: MapLayer::default(),
            results: None,
            dashboard: self.view.dashboard.take(),
        };
    }

    /// Shows a completed analysis.
    pub fn render_analysis(&mut self, analysis: &RouteAnalysis) {
        let map = MapLayer::for_analysis(analysis);
        log::debug!(
            "Rendering route with {} points and {} incidents",
            map.route_line.as_ref().map_or(0, |line| line.path.len()),
            map.incidents.markers.len(),
        );

        self.view = ViewState {
            map,
            results: Some(ResultsPanel::from(&analysis.result)),
            dashboard: self.view.dashboard.take(),
        };
    }

    /// Shows the city dashboard.
    pub fn render_summary(&mut self, summary: &DataSummary) {
        self.view = ViewState {
            map: std::mem::take(&mut self.view.map),
            results: self.view.results.take(),
            dashboard: Some(DashboardView {
                summary: SummaryPanel::from(summary),
                charts: Dashboard::from(summary),
            }),
        };
    }
}

#[cfg(test)]
mod tests {
    use route_safety_models::{
        AnalysisResult, Coordinate, GeocodedLocation, RouteResult, SafetyLevel,
    };

    use super::*;

    fn location(query: &str, lat: f64, lng: f64) -> GeocodedLocation {
        GeocodedLocation {
            query: query.to_string(),
            coordinate: Coordinate::new(lat, lng),
            display_name: None,
        }
    }

    fn analysis(result: serde_json::Value) -> RouteAnalysis {
        RouteAnalysis {
            origin: location("Harlem", 40.81, -73.95),
            destination: location("SoHo", 40.72, -74.0),
            route: RouteResult::Detailed {
                path: vec![
                    Coordinate::new(40.81, -73.95),
                    Coordinate::new(40.76, -73.98),
                    Coordinate::new(40.72, -74.0),
                ],
            },
            result: serde_json::from_value::<AnalysisResult>(result).unwrap(),
        }
    }

    #[test]
    fn renders_analysis_into_fresh_view() {
        let mut renderer = Renderer::new();
        renderer.render_analysis(&analysis(serde_json::json!({
            "safety_score": 62,
            "safety_level": "Medium",
            "crimes": [
                { "latitude": 40.8, "longitude": -73.95, "category": "Violent Crimes", "severity": 8 },
                { "latitude": 40.75, "longitude": -73.98, "category": "Property Crimes", "severity": 3 }
            ],
            "crime_stats": { "crime_types": { "Robbery": 1, "Theft": 1 } }
        })));

        let view = renderer.view();
        let origin = view.map.origin.as_ref().unwrap();
        assert_eq!(origin.title, "From: Harlem");
        assert_eq!(origin.color, map::ORIGIN_COLOR);
        assert_eq!(
            view.map.destination.as_ref().unwrap().title,
            "To: SoHo"
        );
        let line = view.map.route_line.as_ref().unwrap();
        assert!(!line.fallback);
        assert_eq!(line.style, map::LineStyle::DETAILED);
        assert_eq!(view.map.incidents.markers.len(), 2);
        assert_eq!(view.map.viewport.unwrap().padding_px, 50);

        let results = view.results.as_ref().unwrap();
        assert_eq!(results.level, SafetyLevel::Medium);
        assert_eq!(results.crime_count, 2);
        assert!(results.statistics.is_some());
    }

    #[test]
    fn tolerates_no_crimes_and_missing_stats() {
        let mut renderer = Renderer::new();
        renderer.render_analysis(&analysis(serde_json::json!({
            "safety_score": 100,
            "safety_level": "High"
        })));

        let view = renderer.view();
        assert!(view.map.incidents.markers.is_empty());
        assert!(view.map.incidents.clusters(0.01).is_empty());
        assert!(view.results.as_ref().unwrap().statistics.is_none());
    }

    #[test]
    fn begin_analysis_clears_map_but_keeps_dashboard() {
        let mut renderer = Renderer::new();
        renderer.render_summary(&DataSummary {
            total_crimes: 10,
            ..DataSummary::default()
        });
        renderer.render_analysis(&analysis(serde_json::json!({
            "safety_score": 50,
            "safety_level": "Low"
        })));

        renderer.begin_analysis();

        let view = renderer.view();
        assert!(view.map.is_empty());
        assert!(view.results.is_none());
        assert_eq!(view.dashboard.as_ref().unwrap().summary.total_crimes, "10");
    }

    #[test]
    fn render_summary_keeps_map() {
        let mut renderer = Renderer::new();
        renderer.render_analysis(&analysis(serde_json::json!({
            "safety_score": 70,
            "safety_level": "Medium"
        })));

        renderer.render_summary(&DataSummary::default());

        assert!(!renderer.view().map.is_empty());
        assert!(renderer.view().dashboard.is_some());
    }
}
