//! Client configuration.
//!
//! Defaults are embedded at compile time from `config/default.toml`.
//! [`ClientConfig::from_env`] layers `ROUTE_SAFETY_*` environment variables
//! on top; binaries may override further with the `with_*` builders.

use std::time::Duration;

use serde::Deserialize;

use crate::ConfigError;

/// Environment variable overriding the crime backend base URL.
pub const API_URL_ENV: &str = "ROUTE_SAFETY_API_URL";
/// Environment variable overriding the routing service base URL.
pub const ROUTING_URL_ENV: &str = "ROUTE_SAFETY_ROUTING_URL";
/// Environment variable overriding the routing profile.
pub const ROUTING_PROFILE_ENV: &str = "ROUTE_SAFETY_ROUTING_PROFILE";
/// Environment variable overriding the request timeout (seconds, 0 = none).
pub const TIMEOUT_ENV: &str = "ROUTE_SAFETY_TIMEOUT_SECS";

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Deserialize)]
struct ConfigFile {
    api_base_url: String,
    routing_base_url: String,
    #[serde(default = "default_profile")]
    routing_profile: String,
    #[serde(default)]
    request_timeout_secs: u64,
}

fn default_profile() -> String {
    "driving".to_string()
}

/// Endpoints and transport settings shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Crime backend base URL, without a trailing slash.
    pub api_base_url: String,
    /// OSRM-compatible routing service base URL, without a trailing slash.
    pub routing_base_url: String,
    /// Routing profile path segment (e.g. `"driving"`).
    pub routing_profile: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Returns the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the embedded TOML is malformed.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid config.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::de::from_str(text)?;
        Ok(Self {
            api_base_url: trim_base(&file.api_base_url),
            routing_base_url: trim_base(&file.routing_base_url),
            routing_profile: file.routing_profile,
            request_timeout: timeout_from_secs(file.request_timeout_secs),
        })
    }

    /// Returns the defaults with `ROUTE_SAFETY_*` environment overrides
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the defaults fail to parse or an
    /// override has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::defaults()?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = value(API_URL_ENV) {
            self.api_base_url = trim_base(&url);
        }
        if let Some(url) = value(ROUTING_URL_ENV) {
            self.routing_base_url = trim_base(&url);
        }
        if let Some(profile) = value(ROUTING_PROFILE_ENV) {
            self.routing_profile = profile.trim().to_string();
        }
        if let Some(secs) = value(TIMEOUT_ENV) {
            let secs: u64 = secs.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: TIMEOUT_ENV.to_string(),
                message: format!("expected whole seconds: {e}"),
            })?;
            self.request_timeout = timeout_from_secs(secs);
        }
        Ok(())
    }

    /// Overrides the crime backend base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = trim_base(url);
        self
    }

    /// Overrides the routing service base URL.
    #[must_use]
    pub fn with_routing_base_url(mut self, url: &str) -> Self {
        self.routing_base_url = trim_base(url);
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL of a crime backend endpoint (`path` starts with `/`).
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url)
    }

    /// Builds the shared HTTP client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] if the TLS backend fails to
    /// initialise.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("route-safety/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

const fn timeout_from_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let config = ClientConfig::defaults().unwrap();
        assert!(!config.api_base_url.is_empty());
        assert!(config.routing_base_url.starts_with("https://"));
        assert_eq!(config.routing_profile, "driving");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = ClientConfig::from_toml(
            r#"
            api_base_url = "http://localhost:5000/"
            routing_base_url = "http://osrm.local//"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url("/api/crimes"), "http://localhost:5000/api/crimes");
        assert_eq!(config.routing_base_url, "http://osrm.local");
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn overrides_apply_and_zero_disables_timeout() {
        let env: BTreeMap<&str, &str> = [
            (API_URL_ENV, "http://backend:8080/"),
            (TIMEOUT_ENV, "0"),
            (ROUTING_PROFILE_ENV, "   "),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::defaults().unwrap();
        config
            .apply_overrides(|key| env.get(key).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.api_base_url, "http://backend:8080");
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.routing_profile, "driving");
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let mut config = ClientConfig::defaults().unwrap();
        let err = config
            .apply_overrides(|key| (key == TIMEOUT_ENV).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
