#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route safety analysis pipeline.
//!
//! Resolves two addresses, plans a driving route between them and asks
//! the crime backend which incidents lie along it:
//!
//! 1. **Geocoding** ([`geocoder`]): both addresses are resolved
//!    concurrently through the backend's `/api/geocode` endpoint.
//! 2. **Routing** ([`router`]): an OSRM-compatible service supplies the
//!    road geometry. Any routing failure degrades to a straight line
//!    instead of failing the analysis.
//! 3. **Crime lookup** ([`crimes`]): the route is posted to `/api/crimes`,
//!    which returns nearby incidents and a safety score.
//!
//! [`orchestrator::RouteAnalyzer`] sequences the three phases and keeps a
//! [`loading::LoadingIndicator`] visible for exactly as long as a request
//! is outstanding. [`summary`] loads the city-wide dashboard data.

pub mod config;
pub mod crimes;
pub mod geocoder;
mod http;
pub mod loading;
pub mod orchestrator;
pub mod router;
pub mod summary;

use thiserror::Error;

pub use config::ClientConfig;
pub use orchestrator::RouteAnalyzer;

/// Message shown when either address is missing.
pub const MISSING_LOCATIONS_MESSAGE: &str = "Please enter both starting and destination locations";

/// Message shown when the dashboard summary cannot be loaded.
pub const SUMMARY_FAILED_MESSAGE: &str = "Error loading data summary. Please try again.";

/// Errors from resolving an address.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed or the body could not be decoded.
    #[error("Geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Geocoding failed with HTTP status {status}")]
    Status {
        /// Numeric HTTP status.
        status: u16,
    },

    /// The backend could not resolve the address.
    #[error("Geocoding failed for '{address}'")]
    LookupFailed {
        /// The address that was looked up.
        address: String,
    },
}

/// Errors from the routing service. Never surfaced to users: any of these
/// turns into a straight-line fallback route.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// HTTP request failed, timed out, or the body was not valid JSON.
    #[error("Routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Routing service returned HTTP status {status}")]
    Status {
        /// Numeric HTTP status.
        status: u16,
    },

    /// The service reported a non-`Ok` response code.
    #[error("Routing service returned code '{code}'")]
    Code {
        /// The `code` field of the response.
        code: String,
    },

    /// The response contained no routes.
    #[error("Routing service returned no routes")]
    NoRoutes,

    /// The route geometry could not be used.
    #[error("Invalid route geometry: {message}")]
    InvalidGeometry {
        /// What was wrong with the geometry.
        message: String,
    },
}

/// Errors from the crime backend (crime lookup and dashboard summary).
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP request failed or the body could not be decoded.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP error! Status: {status}")]
    Status {
        /// Numeric HTTP status.
        status: u16,
    },

    /// The response body was not the expected JSON.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Terminal failure of a route analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The user input was rejected before any request was made.
    #[error("{message}")]
    Validation {
        /// User-facing explanation.
        message: String,
    },

    /// One of the addresses could not be resolved.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    /// The crime lookup failed.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl AnalysisError {
    /// Message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::Geocode(_) | Self::Network(_) => {
                let detail = self.to_string();
                if detail.is_empty() {
                    "Error analyzing route. Please try again.".to_string()
                } else {
                    format!("Error analyzing route. {detail}")
                }
            }
        }
    }
}

/// Errors from building the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The embedded defaults did not parse.
    #[error("Failed to parse client config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An override had an unusable value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// Setting name.
        key: String,
        /// What was wrong with it.
        message: String,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = AnalysisError::Validation {
            message: MISSING_LOCATIONS_MESSAGE.to_string(),
        };
        assert_eq!(err.user_message(), MISSING_LOCATIONS_MESSAGE);
    }

    #[test]
    fn network_failures_are_prefixed() {
        let err = AnalysisError::from(NetworkError::Status { status: 500 });
        assert_eq!(
            err.user_message(),
            "Error analyzing route. HTTP error! Status: 500"
        );
    }

    #[test]
    fn geocode_failures_are_prefixed() {
        let err = AnalysisError::from(GeocodeError::LookupFailed {
            address: "Nowhere".to_string(),
        });
        assert_eq!(
            err.user_message(),
            "Error analyzing route. Geocoding failed for 'Nowhere'"
        );
    }
}
