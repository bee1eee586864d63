//! Driving routes from an OSRM-compatible routing service.
//!
//! Requests
//! `GET {base}/route/v1/{profile}/{lng1},{lat1};{lng2},{lat2}?overview=full&geometries=geojson`
//! and converts the `GeoJSON` geometry (`[lng, lat]` pairs) into
//! `(lat, lng)` [`Coordinate`]s.
//!
//! Routing is best-effort. [`plan_route`] turns every [`RoutingError`]
//! into a straight-line [`RouteResult::Fallback`] so a routing outage
//! only degrades the analysis.
//!
//! See <https://project-osrm.org/docs/v5.24.0/api/#route-service>

use async_trait::async_trait;
use route_safety_models::{Coordinate, RouteResult};
use serde::Deserialize;

use crate::{ClientConfig, RoutingError};

/// Supplies a road path between two points.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Fetches the path from `origin` to `destination` in `(lat, lng)`
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError`] if the service fails or returns no usable
    /// route.
    async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, RoutingError>;
}

/// [`RouteProvider`] backed by an OSRM route service.
pub struct OsrmRouter {
    client: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OsrmRouter {
    /// Creates a router for the service in `config`.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.routing_base_url.clone(),
            profile: config.routing_profile.clone(),
        }
    }

    /// Route request URL. Waypoints are written longitude first.
    #[must_use]
    pub fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url,
            self.profile,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude,
        )
    }
}

#[async_trait]
impl RouteProvider for OsrmRouter {
    async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, RoutingError> {
        let url = self.route_url(origin, destination);
        log::debug!("Requesting route: {url}");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(RoutingError::Status {
                status: resp.status().as_u16(),
            });
        }

        let body: OsrmRouteResponse = resp.json().await?;
        parse_route(body)
    }
}

/// OSRM route response (only the fields used here).
#[derive(Debug, Deserialize)]
pub struct OsrmRouteResponse {
    /// `"Ok"` on success.
    pub code: String,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

/// One route alternative.
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    pub geometry: OsrmGeometry,
}

/// `GeoJSON` `LineString` geometry of a route.
#[derive(Debug, Deserialize)]
pub struct OsrmGeometry {
    /// `[lng, lat]` positions.
    #[serde(default)]
    pub coordinates: Vec<Vec<f64>>,
}

/// Extracts the first route's path, swapping `[lng, lat]` to `(lat, lng)`.
///
/// # Errors
///
/// Returns [`RoutingError`] for a non-`Ok` code, an empty route list, or
/// a geometry with malformed positions or fewer than two points.
pub fn parse_route(body: OsrmRouteResponse) -> Result<Vec<Coordinate>, RoutingError> {
    if body.code != "Ok" {
        return Err(RoutingError::Code { code: body.code });
    }

    let Some(route) = body.routes.into_iter().next() else {
        return Err(RoutingError::NoRoutes);
    };

    let path = route
        .geometry
        .coordinates
        .iter()
        .map(|position| match position.as_slice() {
            [lng, lat, ..] => Ok(Coordinate::from_lng_lat(*lng, *lat)),
            _ => Err(RoutingError::InvalidGeometry {
                message: format!(
                    "position has {} values, expected at least 2",
                    position.len()
                ),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if path.len() < 2 {
        return Err(RoutingError::InvalidGeometry {
            message: format!("route has {} points, expected at least 2", path.len()),
        });
    }

    Ok(path)
}

/// Plans the route between two points, falling back to a straight line
/// when the provider fails.
pub async fn plan_route(
    provider: &dyn RouteProvider,
    origin: Coordinate,
    destination: Coordinate,
) -> RouteResult {
    match provider.fetch_route(origin, destination).await {
        Ok(path) => {
            log::info!("Routing service returned {} points", path.len());
            RouteResult::Detailed { path }
        }
        Err(e) => {
            log::warn!("Error getting route: {e}");
            log::warn!("Falling back to simple straight line route");
            RouteResult::straight_line(origin, destination)
        }
    }
}
