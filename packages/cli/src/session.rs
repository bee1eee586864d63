//! One user's analysis session: the pipeline plus the current view.

use std::sync::Arc;

use route_safety_client::loading::LoadingIndicator;
use route_safety_client::orchestrator::validate_locations;
use route_safety_client::summary::{BackendSummaryFetcher, SummaryFetcher, load_data_summary};
use route_safety_client::{AnalysisError, ClientConfig, ConfigError, NetworkError, RouteAnalyzer};
use route_safety_render::{Renderer, ViewState};

/// Runs analyses and summary loads, keeping the rendered view between
/// them.
pub struct Session {
    analyzer: RouteAnalyzer,
    summary: Box<dyn SummaryFetcher>,
    renderer: Renderer,
    loading: Arc<dyn LoadingIndicator>,
}

impl Session {
    /// Creates a session talking to the services in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        loading: Arc<dyn LoadingIndicator>,
    ) -> Result<Self, ConfigError> {
        let client = config.http_client()?;
        Ok(Self::with_components(
            RouteAnalyzer::with_client(client.clone(), config),
            Box::new(BackendSummaryFetcher::new(client, config)),
            loading,
        ))
    }

    /// Creates a session from explicit components.
    #[must_use]
    pub fn with_components(
        analyzer: RouteAnalyzer,
        summary: Box<dyn SummaryFetcher>,
        loading: Arc<dyn LoadingIndicator>,
    ) -> Self {
        Self {
            analyzer,
            summary,
            renderer: Renderer::new(),
            loading,
        }
    }

    /// Analyzes the route between two addresses and renders the result.
    ///
    /// Blank input is rejected with the current view untouched. Otherwise
    /// the previous route is cleared first, so a failed analysis leaves an
    /// empty map.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] if validation, geocoding or the crime
    /// lookup fails.
    pub async fn analyze(&mut self, from: &str, to: &str) -> Result<&ViewState, AnalysisError> {
        validate_locations(from, to)?;
        self.renderer.begin_analysis();
        let analysis = self
            .analyzer
            .analyze(from, to, self.loading.as_ref())
            .await
            .inspect_err(|e| log::error!("Route analysis failed: {e}"))?;
        self.renderer.render_analysis(&analysis);
        Ok(self.renderer.view())
    }

    /// Loads and renders the city dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] if the summary cannot be loaded.
    pub async fn load_summary(&mut self) -> Result<&ViewState, NetworkError> {
        let summary = load_data_summary(self.summary.as_ref(), self.loading.as_ref()).await?;
        self.renderer.render_summary(&summary);
        Ok(self.renderer.view())
    }
}
