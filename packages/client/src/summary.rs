//! City-wide dashboard summary.
//!
//! `GET /api/data-summary` returns totals, a monthly time series and
//! breakdowns by crime type, time of day and borough.

use async_trait::async_trait;
use route_safety_models::DataSummary;

use crate::loading::{LoadingGuard, LoadingIndicator};
use crate::{ClientConfig, NetworkError, http};

/// Loads the dashboard summary.
#[async_trait]
pub trait SummaryFetcher: Send + Sync {
    /// Fetches the current summary.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] on transport failure, a non-success
    /// status or an undecodable body.
    async fn fetch_summary(&self) -> Result<DataSummary, NetworkError>;
}

/// [`SummaryFetcher`] backed by the crime backend.
pub struct BackendSummaryFetcher {
    client: reqwest::Client,
    url: String,
}

impl BackendSummaryFetcher {
    /// Creates a fetcher for the backend in `config`.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            url: config.api_url("/api/data-summary"),
        }
    }
}

#[async_trait]
impl SummaryFetcher for BackendSummaryFetcher {
    async fn fetch_summary(&self) -> Result<DataSummary, NetworkError> {
        log::debug!("Loading data summary from {}", self.url);
        let resp = self.client.get(&self.url).send().await?;
        http::decode_json(resp).await
    }
}

/// Loads the summary with `loading` visible until the request settles.
///
/// # Errors
///
/// Returns [`NetworkError`] if the fetch fails; the indicator is hidden
/// either way.
pub async fn load_data_summary(
    fetcher: &dyn SummaryFetcher,
    loading: &dyn LoadingIndicator,
) -> Result<DataSummary, NetworkError> {
    let _guard = LoadingGuard::show(loading, "Loading data summary");
    let summary = fetcher.fetch_summary().await.inspect_err(|e| {
        log::error!("Error loading data summary: {e}");
    })?;
    log::info!(
        "Loaded data summary: {} crimes ({} violent, {} property)",
        summary.total_crimes,
        summary.violent_crimes,
        summary.property_crimes,
    );
    Ok(summary)
}
