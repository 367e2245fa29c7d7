//! Stable Audio 2 client.

use super::{AudioGenerator, GenerationError};
use crate::config::StableAudioSettings;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://api.stability.ai";
// Generation regularly takes minutes for longer durations.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub struct StableAudioClient {
    client: Client,
    base_url: String,
    api_key: String,
    settings: StableAudioSettings,
}

impl StableAudioClient {
    pub fn new(api_key: impl Into<String>, settings: StableAudioSettings) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, settings)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        settings: StableAudioSettings,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            settings,
        }
    }

    fn base_form(&self, prompt: &str, duration_secs: u32) -> Form {
        Form::new()
            .text("prompt", prompt.to_string())
            .text("duration", duration_secs.to_string())
            .text("seed", self.settings.seed.to_string())
            .text("steps", self.settings.steps.to_string())
            .text("cfg_scale", self.settings.cfg_scale.to_string())
            .text("output_format", self.settings.output_format.clone())
    }

    async fn post_generation(
        &self,
        endpoint: &str,
        form: Form,
        dest: &Path,
    ) -> Result<(), GenerationError> {
        let url = format!("{}/v2beta/audio/stable-audio-2/{}", self.base_url, endpoint);
        debug!(endpoint = endpoint, "requesting audio generation");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "audio/*")
            .timeout(REQUEST_TIMEOUT)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Connection(e.to_string()))?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;
        info!(
            dest = %dest.display(),
            bytes = bytes.len(),
            "generated audio saved"
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl AudioGenerator for StableAudioClient {
    fn output_format(&self) -> &str {
        &self.settings.output_format
    }

    async fn from_text(
        &self,
        prompt: &str,
        duration_secs: u32,
        dest: &Path,
    ) -> Result<(), GenerationError> {
        let form = self.base_form(prompt, duration_secs);
        self.post_generation("text-to-audio", form, dest).await
    }

    async fn from_reference(
        &self,
        prompt: &str,
        reference: &Path,
        duration_secs: u32,
        dest: &Path,
    ) -> Result<(), GenerationError> {
        let audio = tokio::fs::read(reference).await?;
        let file_name = reference
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("reference")
            .to_string();
        let form = self
            .base_form(prompt, duration_secs)
            .text("strength", self.settings.strength.to_string())
            .part("audio", Part::bytes(audio).file_name(file_name));
        self.post_generation("audio-to-audio", form, dest).await
    }
}
