use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub audio_cache_age_sec: Option<usize>,
    pub frontend_dir_path: Option<String>,
    pub output_dir: Option<String>,

    // API keys, fall back to environment variables when absent
    pub opencage_api_key: Option<String>,
    pub openweather_api_key: Option<String>,

    // Feature configs
    pub llm: Option<LlmFileConfig>,
    pub stable_audio: Option<StableAudioFileConfig>,
    pub uploads: Option<UploadsFileConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LlmFileConfig {
    /// Base URL of an OpenAI-compatible chat completions API.
    pub base_url: Option<String>,
    /// Model used to caption uploaded images.
    pub caption_model: Option<String>,
    /// Model used to interpret weather and journal into a music prompt.
    pub mood_model: Option<String>,
    pub api_key: Option<String>,
    /// Shell command whose stdout is the API key, e.g. a password manager
    /// lookup. Takes precedence over `api_key`.
    pub api_key_command: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct StableAudioFileConfig {
    pub api_key: Option<String>,
    pub seed: Option<u32>,
    pub steps: Option<u32>,
    pub cfg_scale: Option<f64>,
    /// How strongly a reference audio shapes the result, 0.0 to 1.0.
    pub strength: Option<f64>,
    /// "mp3" or "wav".
    pub output_format: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct UploadsFileConfig {
    pub temp_dir: Option<String>,
    pub max_upload_mb: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
