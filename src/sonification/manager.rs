//! Sonification manager - orchestrates the request pipeline.
//!
//! Request workflow:
//! 1. Resolve the place, or fall back to the server's network origin
//! 2. Fetch a current weather snapshot for it
//! 3. Caption the uploaded image, when there is one
//! 4. Interpret weather + journal + caption into a mood and a music prompt
//! 5. Generate audio, guided by the reference recording when one was uploaded
//!
//! Uploaded media is staged in a per-request temp directory and released
//! after the pipeline, on success and on failure alike.

use super::assets::AssetStore;
use super::models::{
    SonificationOutcome, SonificationRequest, MAX_DURATION_SECS, NETWORK_ORIGIN_LABEL,
};
use super::SonificationError;
use crate::captioning::SceneDescriber;
use crate::generation::{AudioGenerator, GenerationMode};
use crate::geocoding::LocationResolver;
use crate::mood::MoodSynthesizer;
use crate::weather::{WeatherProvider, WeatherSnapshot};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Configuration for the SonificationManager.
#[derive(Clone)]
pub struct SonificationConfig {
    /// Directory for temporary uploaded files.
    pub temp_dir: PathBuf,
    /// Directory where generated audio is written.
    pub output_dir: PathBuf,
    /// Maximum size of one upload in bytes.
    pub max_upload_size: u64,
}

impl Default for SonificationConfig {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir().join("moodsound-uploads"),
            output_dir: PathBuf::from("audio"),
            max_upload_size: 25 * 1024 * 1024,
        }
    }
}

/// Runs the sonification pipeline.
pub struct SonificationManager {
    location_resolver: Arc<dyn LocationResolver>,
    weather: Arc<dyn WeatherProvider>,
    scene_describer: Arc<dyn SceneDescriber>,
    mood_synthesizer: Arc<dyn MoodSynthesizer>,
    audio_generator: Arc<dyn AudioGenerator>,
    assets: AssetStore,
    config: SonificationConfig,
}

impl SonificationManager {
    pub fn new(
        location_resolver: Arc<dyn LocationResolver>,
        weather: Arc<dyn WeatherProvider>,
        scene_describer: Arc<dyn SceneDescriber>,
        mood_synthesizer: Arc<dyn MoodSynthesizer>,
        audio_generator: Arc<dyn AudioGenerator>,
        config: SonificationConfig,
    ) -> Self {
        let assets = AssetStore::new(&config.temp_dir, config.max_upload_size);

        Self {
            location_resolver,
            weather,
            scene_describer,
            mood_synthesizer,
            audio_generator,
            assets,
            config,
        }
    }

    /// Initialize the manager (creates temp and output directories).
    pub async fn init(&self) -> Result<()> {
        self.assets.init().await?;
        fs::create_dir_all(&self.config.output_dir).await?;
        Ok(())
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Run one request through the pipeline.
    ///
    /// Whatever the pipeline did, temp uploads of this request are released
    /// before the result is returned.
    pub async fn handle(
        &self,
        request: SonificationRequest,
    ) -> Result<SonificationOutcome, SonificationError> {
        let request_id = Uuid::new_v4().to_string();
        debug!(request_id = %request_id, "starting sonification request");

        let outcome = self.run_pipeline(&request_id, &request).await;
        self.assets.release(&request_id).await;

        match &outcome {
            Ok(outcome) => {
                info!(
                    request_id = %request_id,
                    mode = outcome.mode.as_str(),
                    file = %outcome.audio_filename,
                    "sonification request completed"
                );
            }
            Err(e) => {
                warn!(
                    request_id = %request_id,
                    kind = e.kind().as_str(),
                    "sonification request failed: {}", e
                );
            }
        }
        outcome
    }

    async fn run_pipeline(
        &self,
        request_id: &str,
        request: &SonificationRequest,
    ) -> Result<SonificationOutcome, SonificationError> {
        // Weather for an explicit place, or for wherever this server appears
        // to be on the network.
        let place = request
            .location
            .as_deref()
            .map(str::trim)
            .filter(|place| !place.is_empty());
        let (location_label, weather) = match place {
            Some(place) => {
                let coordinates = self
                    .location_resolver
                    .resolve(place)
                    .await?
                    .ok_or_else(|| SonificationError::InvalidLocation(place.to_string()))?;
                let weather = self
                    .weather
                    .by_coordinates(coordinates)
                    .await
                    .ok_or(SonificationError::WeatherUnavailable)?;
                (coordinates.label(), weather)
            }
            None => {
                let weather = self
                    .weather
                    .by_network_origin()
                    .await
                    .ok_or(SonificationError::WeatherUnavailable)?;
                (NETWORK_ORIGIN_LABEL.to_string(), weather)
            }
        };

        // Caption the image when one came with the request.
        let image_caption = match &request.image {
            Some(upload) => {
                let image_path = self
                    .assets
                    .save_upload(request_id, &upload.filename, &upload.data)
                    .await?;
                self.scene_describer.describe(&image_path).await?
            }
            None => String::new(),
        };

        // Always interpret. Weather alone is enough input.
        let journal = request.journal.as_deref().unwrap_or("");
        let interpretation = self
            .mood_synthesizer
            .interpret(&weather, journal, &image_caption)
            .await?;

        // One cap, applied before the mode branch so both modes see it.
        let duration_secs = request.duration_secs.min(MAX_DURATION_SECS);

        // The mode is fixed here. The branch below follows it, nothing
        // downstream decides again.
        let mode = GenerationMode::for_reference(request.reference_audio.is_some());
        let audio_filename = format!("{}.{}", request_id, self.audio_generator.output_format());
        let dest = self.config.output_dir.join(&audio_filename);
        match &request.reference_audio {
            Some(upload) => {
                let reference_path = self
                    .assets
                    .save_upload(request_id, &upload.filename, &upload.data)
                    .await?;
                self.audio_generator
                    .from_reference(
                        &interpretation.suggested_prompt,
                        &reference_path,
                        duration_secs,
                        &dest,
                    )
                    .await?;
            }
            None => {
                self.audio_generator
                    .from_text(&interpretation.suggested_prompt, duration_secs, &dest)
                    .await?;
            }
        }

        Ok(SonificationOutcome {
            location: location_label,
            image_caption,
            weather_summary: weather.summary_line(),
            mood_keywords: interpretation.mood_keywords,
            summary: interpretation.summary,
            prompt: interpretation.suggested_prompt,
            mode,
            audio_filename,
        })
    }
}
