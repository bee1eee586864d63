//! Route analysis pipeline: geocode, route, crime lookup.
//!
//! [`RouteAnalyzer::analyze`] runs the phases strictly in order, except
//! that the two addresses are geocoded concurrently. That join is a
//! `try_join`: both lookups must succeed, and the first failure ends the
//! analysis before any routing or crime request is made.

use futures::future::try_join;
use route_safety_models::{RouteAnalysis, RouteRequest};

use crate::crimes::{BackendCrimeFetcher, CrimeFetcher};
use crate::geocoder::{BackendGeocoder, Geocoder};
use crate::loading::{LoadingGuard, LoadingIndicator};
use crate::router::{OsrmRouter, RouteProvider, plan_route};
use crate::{AnalysisError, ClientConfig, MISSING_LOCATIONS_MESSAGE};

/// Sequences geocoding, routing and the crime lookup for one route.
pub struct RouteAnalyzer {
    geocoder: Box<dyn Geocoder>,
    router: Box<dyn RouteProvider>,
    crimes: Box<dyn CrimeFetcher>,
}

impl RouteAnalyzer {
    /// Creates an analyzer from explicit components.
    #[must_use]
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        router: Box<dyn RouteProvider>,
        crimes: Box<dyn CrimeFetcher>,
    ) -> Self {
        Self {
            geocoder,
            router,
            crimes,
        }
    }

    /// Creates an analyzer talking to the services in `config`. The
    /// components share `client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self::new(
            Box::new(BackendGeocoder::new(client.clone(), config)),
            Box::new(OsrmRouter::new(client.clone(), config)),
            Box::new(BackendCrimeFetcher::new(client, config)),
        )
    }

    /// Analyzes the route between two addresses.
    ///
    /// `loading` is shown on entry, updated at each phase and hidden
    /// exactly once when this returns, whether it succeeds or fails.
    /// A routing failure is not an error; the analysis continues with a
    /// straight-line route.
    ///
    /// # Errors
    ///
    /// * [`AnalysisError::Validation`] if either address is blank.
    /// * [`AnalysisError::Geocode`] if either address cannot be resolved.
    /// * [`AnalysisError::Network`] if the crime lookup fails.
    pub async fn analyze(
        &self,
        from: &str,
        to: &str,
        loading: &dyn LoadingIndicator,
    ) -> Result<RouteAnalysis, AnalysisError> {
        let guard = LoadingGuard::show(loading, "Analyzing route");

        let (from, to) = validate_locations(from, to)?;
        log::info!("Analyzing route from '{from}' to '{to}'");

        guard.phase("Geocoding addresses");
        let (origin, destination) =
            try_join(self.geocoder.geocode(from), self.geocoder.geocode(to))
                .await
                .inspect_err(|e| log::error!("Error geocoding address: {e}"))?;
        log::info!(
            "Resolved '{from}' to ({}) and '{to}' to ({})",
            origin.coordinate,
            destination.coordinate,
        );

        guard.phase("Fetching route");
        let route = plan_route(
            self.router.as_ref(),
            origin.coordinate,
            destination.coordinate,
        )
        .await;

        guard.phase("Analyzing crimes along route");
        let request = RouteRequest::for_route(origin.coordinate, destination.coordinate, &route);
        let result = self
            .crimes
            .fetch_crimes(&request)
            .await
            .inspect_err(|e| log::error!("Error analyzing route: {e}"))?;

        if !result.level_matches_score() {
            log::warn!(
                "Backend safety level {} does not match score {}",
                result.safety_level,
                result.safety_score,
            );
        }

        Ok(RouteAnalysis {
            origin,
            destination,
            route,
            result,
        })
    }
}

/// Trims both addresses and rejects the pair if either is blank.
///
/// # Errors
///
/// Returns [`AnalysisError::Validation`] with
/// [`MISSING_LOCATIONS_MESSAGE`] if either address is blank.
pub fn validate_locations<'a>(
    from: &'a str,
    to: &'a str,
) -> Result<(&'a str, &'a str), AnalysisError> {
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return Err(AnalysisError::Validation {
            message: MISSING_LOCATIONS_MESSAGE.to_string(),
        });
    }
    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use route_safety_models::{
        AnalysisResult, Coordinate, GeocodedLocation, RouteResult, SafetyLevel,
    };

    use super::*;
    use crate::loading::tests::CountingLoading;
    use crate::router::parse_route;
    use crate::router::tests::{FixedRoute, osrm_response};
    use crate::{GeocodeError, NetworkError, RoutingError};

    struct FakeGeocoder {
        known: BTreeMap<&'static str, Coordinate>,
        calls: AtomicUsize,
    }

    impl FakeGeocoder {
        fn new(known: &[(&'static str, Coordinate)]) -> Self {
            Self {
                known: known.iter().copied().collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, address: &str) -> Result<GeocodedLocation, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.known
                .get(address)
                .map(|coordinate| GeocodedLocation {
                    query: address.to_string(),
                    coordinate: *coordinate,
                    display_name: None,
                })
                .ok_or_else(|| GeocodeError::LookupFailed {
                    address: address.to_string(),
                })
        }
    }

    struct FakeCrimes {
        response: fn() -> Result<AnalysisResult, NetworkError>,
        requests: Mutex<Vec<RouteRequest>>,
    }

    impl FakeCrimes {
        fn new(response: fn() -> Result<AnalysisResult, NetworkError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<RouteRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CrimeFetcher for FakeCrimes {
        async fn fetch_crimes(
            &self,
            request: &RouteRequest,
        ) -> Result<AnalysisResult, NetworkError> {
            self.requests.lock().unwrap().push(request.clone());
            (self.response)()
        }
    }

    /// Shares a fake between the analyzer (which owns a `Box`) and the test.
    struct Shared<T>(std::sync::Arc<T>);

    #[async_trait]
    impl<T: Geocoder> Geocoder for Shared<T> {
        async fn geocode(&self, address: &str) -> Result<GeocodedLocation, GeocodeError> {
            self.0.geocode(address).await
        }
    }

    #[async_trait]
    impl<T: RouteProvider> RouteProvider for Shared<T> {
        async fn fetch_route(
            &self,
            origin: Coordinate,
            destination: Coordinate,
        ) -> Result<Vec<Coordinate>, RoutingError> {
            self.0.fetch_route(origin, destination).await
        }
    }

    #[async_trait]
    impl<T: CrimeFetcher> CrimeFetcher for Shared<T> {
        async fn fetch_crimes(
            &self,
            request: &RouteRequest,
        ) -> Result<AnalysisResult, NetworkError> {
            self.0.fetch_crimes(request).await
        }
    }

    struct Harness {
        geocoder: std::sync::Arc<FakeGeocoder>,
        router: std::sync::Arc<FixedRoute>,
        crimes: std::sync::Arc<FakeCrimes>,
        analyzer: RouteAnalyzer,
    }

    impl Harness {
        fn new(
            router: fn() -> Result<Vec<Coordinate>, RoutingError>,
            crimes: fn() -> Result<AnalysisResult, NetworkError>,
        ) -> Self {
            let geocoder = std::sync::Arc::new(FakeGeocoder::new(&[
                ("A", Coordinate::new(40.0, -74.0)),
                ("B", Coordinate::new(40.1, -74.1)),
            ]));
            let router = std::sync::Arc::new(FixedRoute::new(router));
            let crimes = std::sync::Arc::new(FakeCrimes::new(crimes));
            let analyzer = RouteAnalyzer::new(
                Box::new(Shared(geocoder.clone())),
                Box::new(Shared(router.clone())),
                Box::new(Shared(crimes.clone())),
            );
            Self {
                geocoder,
                router,
                crimes,
                analyzer,
            }
        }
    }

    fn three_point_route() -> Result<Vec<Coordinate>, RoutingError> {
        parse_route(osrm_response(serde_json::json!({
            "code": "Ok",
            "routes": [{
                "geometry": {
                    "coordinates": [[-74.0, 40.0], [-74.05, 40.05], [-74.1, 40.1]]
                }
            }]
        })))
    }

    fn routing_down() -> Result<Vec<Coordinate>, RoutingError> {
        Err(RoutingError::Status { status: 502 })
    }

    fn two_crimes() -> Result<AnalysisResult, NetworkError> {
        Ok(serde_json::from_value(serde_json::json!({
            "safety_score": 62,
            "safety_level": "Medium",
            "crimes": [
                {
                    "latitude": 40.02,
                    "longitude": -74.02,
                    "category": "Violent Crimes",
                    "crime_type": "Robbery",
                    "severity": 8
                },
                {
                    "latitude": 40.07,
                    "longitude": -74.07,
                    "category": "Property Crimes",
                    "crime_type": "Burglary",
                    "severity": 3
                }
            ],
            "crime_stats": {}
        }))
        .unwrap())
    }

    fn backend_down() -> Result<AnalysisResult, NetworkError> {
        Err(NetworkError::Status { status: 500 })
    }

    #[tokio::test]
    async fn scenario_detailed_route_with_two_crimes() {
        let harness = Harness::new(three_point_route, two_crimes);
        let loading = CountingLoading::default();

        let analysis = harness.analyzer.analyze("A", "B", &loading).await.unwrap();

        assert_eq!(
            analysis.route,
            RouteResult::Detailed {
                path: vec![
                    Coordinate::new(40.0, -74.0),
                    Coordinate::new(40.05, -74.05),
                    Coordinate::new(40.1, -74.1),
                ]
            }
        );
        assert_eq!(analysis.result.crimes.len(), 2);
        assert_eq!(analysis.result.safety_level, SafetyLevel::Medium);
        assert!((analysis.result.safety_score - 62.0).abs() < f64::EPSILON);
        assert!(analysis.result.crime_stats.is_none());

        let requests = harness.crimes.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path.as_deref(), Some(analysis.route.path()));
        assert_eq!(harness.geocoder.calls.load(Ordering::SeqCst), 2);

        assert!(loading.shows() >= 1);
        assert_eq!(loading.hides(), 1);
    }

    #[tokio::test]
    async fn routing_failure_uses_straight_line_without_path() {
        let harness = Harness::new(routing_down, two_crimes);
        let loading = CountingLoading::default();

        let analysis = harness.analyzer.analyze("A", "B", &loading).await.unwrap();

        assert!(analysis.route.is_fallback());
        assert_eq!(
            analysis.route.path(),
            &[Coordinate::new(40.0, -74.0), Coordinate::new(40.1, -74.1)]
        );
        let requests = harness.crimes.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].path.is_none());
        assert_eq!(loading.hides(), 1);
    }

    #[tokio::test]
    async fn geocode_failure_issues_no_further_requests() {
        let harness = Harness::new(three_point_route, two_crimes);
        let loading = CountingLoading::default();

        let err = harness
            .analyzer
            .analyze("A", "Atlantis", &loading)
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Geocode(_)));
        assert_eq!(harness.router.calls(), 0);
        assert!(harness.crimes.requests().is_empty());
        assert!(loading.shows() >= 1);
        assert_eq!(loading.hides(), 1);
    }

    #[tokio::test]
    async fn blank_input_fails_before_any_request() {
        let harness = Harness::new(three_point_route, two_crimes);
        let loading = CountingLoading::default();

        let err = harness
            .analyzer
            .analyze("A", "   ", &loading)
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), MISSING_LOCATIONS_MESSAGE);
        assert_eq!(harness.geocoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(harness.router.calls(), 0);
        assert!(loading.shows() >= 1);
        assert_eq!(loading.hides(), 1);
    }

    #[tokio::test]
    async fn crime_lookup_failure_propagates() {
        let harness = Harness::new(three_point_route, backend_down);
        let loading = CountingLoading::default();

        let err = harness
            .analyzer
            .analyze("A", "B", &loading)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Network(NetworkError::Status { status: 500 })
        ));
        assert_eq!(harness.crimes.requests().len(), 1);
        assert_eq!(loading.hides(), 1);
    }
}
