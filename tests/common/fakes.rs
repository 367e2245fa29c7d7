//! Canned pipeline collaborators
//!
//! End-to-end tests exercise the real HTTP surface and the real manager,
//! with the outbound services swapped for deterministic fakes.

use async_trait::async_trait;
use moodsound_server::captioning::{CaptionError, SceneDescriber};
use moodsound_server::generation::{AudioGenerator, GenerationError};
use moodsound_server::geocoding::{Coordinates, GeocodeError, LocationResolver};
use moodsound_server::mood::{MoodInterpretation, MoodSynthesizer, SynthesisError};
use moodsound_server::weather::{WeatherProvider, WeatherSnapshot};
use std::path::Path;
use std::sync::Mutex;

use super::constants::*;

/// Snapshot every fake weather lookup returns.
pub fn taipei_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        city: "Taipei".to_string(),
        temperature: 28.0,
        humidity: 70,
        weather_main: "Clear".to_string(),
        weather_desc: "clear sky".to_string(),
        wind_speed: 2.1,
    }
}

/// Resolves everything to the Taipei test coordinates, except
/// [`UNRESOLVED_LOCATION`] which it reports as unknown.
pub struct FakeResolver;

#[async_trait]
impl LocationResolver for FakeResolver {
    async fn resolve(&self, place: &str) -> Result<Option<Coordinates>, GeocodeError> {
        if place == UNRESOLVED_LOCATION {
            return Ok(None);
        }
        Ok(Some(Coordinates::new(25.0340, 121.5645)?))
    }
}

/// Answers every lookup with the Taipei snapshot, or with nothing when
/// constructed as unavailable.
pub struct FakeWeather {
    pub available: bool,
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn by_coordinates(&self, _coordinates: Coordinates) -> Option<WeatherSnapshot> {
        self.available.then(taipei_snapshot)
    }

    async fn by_network_origin(&self) -> Option<WeatherSnapshot> {
        self.available.then(taipei_snapshot)
    }
}

/// Describes every image the same way.
pub struct FakeDescriber;

#[async_trait]
impl SceneDescriber for FakeDescriber {
    async fn describe(&self, _image: &Path) -> Result<String, CaptionError> {
        Ok(FAKE_CAPTION.to_string())
    }
}

/// Produces a fixed interpretation regardless of input.
pub struct FakeSynthesizer;

#[async_trait]
impl MoodSynthesizer for FakeSynthesizer {
    async fn interpret(
        &self,
        weather: &WeatherSnapshot,
        _journal: &str,
        _image_caption: &str,
    ) -> Result<MoodInterpretation, SynthesisError> {
        Ok(MoodInterpretation {
            location: weather.city.clone(),
            summary: FAKE_SUMMARY.to_string(),
            mood_keywords: FAKE_MOOD_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            suggested_prompt: FAKE_PROMPT.to_string(),
        })
    }
}

/// Arguments of one generator call, captured for assertions.
#[derive(Debug, Clone)]
pub struct RecordedGeneration {
    pub prompt: String,
    pub duration_secs: u32,
    pub used_reference: bool,
}

/// Writes [`FAKE_AUDIO`] wherever asked and records how it was called.
pub struct FakeGenerator {
    calls: Mutex<Vec<RecordedGeneration>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn last_call(&self) -> Option<RecordedGeneration> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn record(&self, prompt: &str, duration_secs: u32, used_reference: bool) {
        self.calls.lock().unwrap().push(RecordedGeneration {
            prompt: prompt.to_string(),
            duration_secs,
            used_reference,
        });
    }
}

#[async_trait]
impl AudioGenerator for FakeGenerator {
    fn output_format(&self) -> &str {
        "mp3"
    }

    async fn from_text(
        &self,
        prompt: &str,
        duration_secs: u32,
        dest: &Path,
    ) -> Result<(), GenerationError> {
        self.record(prompt, duration_secs, false);
        tokio::fs::write(dest, FAKE_AUDIO).await?;
        Ok(())
    }

    async fn from_reference(
        &self,
        prompt: &str,
        reference: &Path,
        duration_secs: u32,
        dest: &Path,
    ) -> Result<(), GenerationError> {
        // The uploaded reference must still be on disk when generation runs.
        tokio::fs::metadata(reference).await?;
        self.record(prompt, duration_secs, true);
        tokio::fs::write(dest, FAKE_AUDIO).await?;
        Ok(())
    }
}
