//! Crime lookup along a route.
//!
//! `POST /api/crimes` with `{ from_lat, from_lng, to_lat, to_lng,
//! route_coordinates? }` returns the incidents near the route together
//! with the backend's safety score and aggregate statistics.

use async_trait::async_trait;
use route_safety_models::{AnalysisResult, RouteRequest};

use crate::{ClientConfig, NetworkError, http};

/// Looks up crimes near a route.
#[async_trait]
pub trait CrimeFetcher: Send + Sync {
    /// Submits `request` and returns the backend's analysis.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] on transport failure, a non-success
    /// status or an undecodable body. There are no partial results.
    async fn fetch_crimes(&self, request: &RouteRequest) -> Result<AnalysisResult, NetworkError>;
}

/// [`CrimeFetcher`] backed by the crime backend's `/api/crimes` endpoint.
pub struct BackendCrimeFetcher {
    client: reqwest::Client,
    url: String,
}

impl BackendCrimeFetcher {
    /// Creates a fetcher for the backend in `config`.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            url: config.api_url("/api/crimes"),
        }
    }
}

#[async_trait]
impl CrimeFetcher for BackendCrimeFetcher {
    async fn fetch_crimes(&self, request: &RouteRequest) -> Result<AnalysisResult, NetworkError> {
        log::debug!(
            "Posting crime lookup to {} ({} path points)",
            self.url,
            request.path.as_ref().map_or(0, Vec::len),
        );

        let resp = self.client.post(&self.url).json(request).send().await?;
        let result: AnalysisResult = http::decode_json(resp).await?;

        log::info!(
            "Found {} crimes close to the route (safety score {}, level {})",
            result.crimes.len(),
            result.safety_score,
            result.safety_level,
        );
        Ok(result)
    }
}
