//! Current weather backed by the OpenWeather API.
//!
//! When no coordinates are available, the caller's position is inferred from
//! the server's network origin via ipinfo.io before the weather lookup.

use super::{WeatherProvider, WeatherSnapshot};
use crate::geocoding::Coordinates;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const DEFAULT_ORIGIN_LOOKUP_URL: &str = "https://ipinfo.io/json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const UNITS: &str = "metric";

pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    origin_lookup_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_urls(DEFAULT_BASE_URL, DEFAULT_ORIGIN_LOOKUP_URL, api_key)
    }

    pub fn with_base_urls(
        base_url: impl Into<String>,
        origin_lookup_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            origin_lookup_url: origin_lookup_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Coordinates of wherever this server appears to be on the network.
    async fn origin_coordinates(&self) -> Option<Coordinates> {
        let response = match self
            .client
            .get(&self.origin_lookup_url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Network origin lookup failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Network origin lookup answered {}", response.status());
            return None;
        }

        let body: OriginResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Malformed network origin response: {}", e);
                return None;
            }
        };

        let loc = body.loc?;
        match parse_loc(&loc) {
            Some(coordinates) => {
                debug!(coordinates = %coordinates.label(), "network origin located");
                Some(coordinates)
            }
            None => {
                warn!("Could not parse network origin loc field: {}", loc);
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn by_coordinates(&self, coordinates: Coordinates) -> Option<WeatherSnapshot> {
        let response = match self
            .client
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[
                ("lat", coordinates.latitude().to_string()),
                ("lon", coordinates.longitude().to_string()),
                ("appid", self.api_key.clone()),
                ("units", UNITS.to_string()),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Weather request failed: {}", e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Weather lookup answered {}: {}", status, message);
            return None;
        }

        let body: WeatherResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Malformed weather response: {}", e);
                return None;
            }
        };

        body.into_snapshot()
    }

    async fn by_network_origin(&self) -> Option<WeatherSnapshot> {
        let coordinates = self.origin_coordinates().await?;
        self.by_coordinates(coordinates).await
    }
}

/// Parses an ipinfo.io `loc` value, e.g. "25.0340,121.5624".
fn parse_loc(loc: &str) -> Option<Coordinates> {
    let (lat, lon) = loc.split_once(',')?;
    let latitude = lat.trim().parse().ok()?;
    let longitude = lon.trim().parse().ok()?;
    Coordinates::new(latitude, longitude).ok()
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Deserialize)]
struct OriginResponse {
    loc: Option<String>,
}

#[derive(Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    name: String,
    main: MainSection,
    weather: Vec<ConditionSection>,
    wind: WindSection,
}

#[derive(Deserialize)]
struct MainSection {
    temp: f64,
    humidity: u8,
}

#[derive(Deserialize)]
struct ConditionSection {
    main: String,
    description: String,
}

#[derive(Deserialize)]
struct WindSection {
    speed: f64,
}

impl WeatherResponse {
    fn into_snapshot(self) -> Option<WeatherSnapshot> {
        // OpenWeather always reports at least one condition; an empty array
        // means there is no usable snapshot.
        let condition = self.weather.into_iter().next()?;
        Some(WeatherSnapshot {
            city: self.name,
            temperature: self.main.temp,
            humidity: self.main.humidity,
            weather_main: condition.main,
            weather_desc: condition.description,
            wind_speed: self.wind.speed,
        })
    }
}
