//! Forward geocoding backed by the OpenCage API.

use super::{Coordinates, GeocodeError, LocationResolver};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.opencagedata.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct OpenCageClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenCageClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait::async_trait]
impl LocationResolver for OpenCageClient {
    async fn resolve(&self, place: &str) -> Result<Option<Coordinates>, GeocodeError> {
        debug!(place = %place, "resolving location");

        let response = self
            .client
            .get(format!("{}/geocode/v1/json", self.base_url))
            .query(&[("q", place), ("key", self.api_key.as_str()), ("limit", "1")])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| GeocodeError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        match body.results.into_iter().next() {
            Some(result) => {
                let coordinates = Coordinates::new(result.geometry.lat, result.geometry.lng)?;
                debug!(place = %place, coordinates = %coordinates.label(), "location resolved");
                Ok(Some(coordinates))
            }
            None => {
                debug!(place = %place, "no geocoding results");
                Ok(None)
            }
        }
    }
}

#[derive(Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}
