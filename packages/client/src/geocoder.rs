//! Address geocoding through the crime backend.
//!
//! `GET /api/geocode?location=<text>` answers
//! `{ "success": bool, "lat": f64, "lng": f64, "display_name": "..." }`.
//! No retries: any failure is terminal for the analysis.

use async_trait::async_trait;
use route_safety_models::{Coordinate, GeocodeResponse, GeocodedLocation};

use crate::{ClientConfig, GeocodeError};

/// Resolves a free-text address to a coordinate.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocodes `address`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the lookup fails or the backend is
    /// unreachable.
    async fn geocode(&self, address: &str) -> Result<GeocodedLocation, GeocodeError>;
}

/// [`Geocoder`] backed by the crime backend's `/api/geocode` endpoint.
pub struct BackendGeocoder {
    client: reqwest::Client,
    url: String,
}

impl BackendGeocoder {
    /// Creates a geocoder for the backend in `config`.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            url: config.api_url("/api/geocode"),
        }
    }
}

#[async_trait]
impl Geocoder for BackendGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedLocation, GeocodeError> {
        log::debug!("Geocoding '{address}' via {}", self.url);

        let resp = self
            .client
            .get(&self.url)
            .query(&[("location", address)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(GeocodeError::Status {
                status: resp.status().as_u16(),
            });
        }

        let body: GeocodeResponse = resp.json().await?;
        parse_response(address, body)
    }
}

/// Converts a backend geocode response into a location.
fn parse_response(address: &str, body: GeocodeResponse) -> Result<GeocodedLocation, GeocodeError> {
    let (true, Some(lat), Some(lng)) = (body.success, body.lat, body.lng) else {
        return Err(GeocodeError::LookupFailed {
            address: address.to_string(),
        });
    };

    Ok(GeocodedLocation {
        query: address.to_string(),
        coordinate: Coordinate::new(lat, lng),
        display_name: body.display_name,
    })
}
