//! Current weather lookups.

mod openweather;

pub use openweather::OpenWeatherClient;

use crate::geocoding::Coordinates;
use serde::{Deserialize, Serialize};

/// A snapshot of current conditions at some place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Reporting station's place name, may be empty.
    pub city: String,
    /// Air temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent, 0 to 100.
    pub humidity: u8,
    /// Coarse condition, e.g. "Clear" or "Rain".
    pub weather_main: String,
    /// Finer condition, e.g. "light intensity drizzle".
    pub weather_desc: String,
    /// Wind speed in meters per second.
    pub wind_speed: f64,
}

impl WeatherSnapshot {
    /// One line rendering used in responses, e.g.
    /// "Taipei | 28°C | clear sky | Humidity 70% | Wind 2.1 m/s".
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {}°C | {} | Humidity {}% | Wind {} m/s",
            self.city, self.temperature, self.weather_desc, self.humidity, self.wind_speed
        )
    }
}

/// Provides current weather, either for explicit coordinates or for the
/// location inferred from the server's network origin.
///
/// Absence of data is not an error here. Lookups answer `None` whenever the
/// upstream service cannot produce a usable snapshot.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn by_coordinates(&self, coordinates: Coordinates) -> Option<WeatherSnapshot>;

    async fn by_network_origin(&self) -> Option<WeatherSnapshot>;
}
