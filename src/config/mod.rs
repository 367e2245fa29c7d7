mod file_config;

pub use file_config::{FileConfig, LlmFileConfig, StableAudioFileConfig, UploadsFileConfig};

use crate::llm::ApiKeySource;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CAPTION_MODEL: &str = "gpt-4o";
pub const DEFAULT_MOOD_MODEL: &str = "gpt-4";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub audio_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub output_dir: PathBuf,
    pub temp_dir: Option<PathBuf>,
    pub max_upload_mb: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            logging_level: RequestsLoggingLevel::default(),
            audio_cache_age_sec: 3600,
            frontend_dir_path: None,
            output_dir: PathBuf::from("audio"),
            temp_dir: None,
            max_upload_mb: 25,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub audio_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub output_dir: PathBuf,

    // Upstream credentials
    pub opencage_api_key: String,
    pub openweather_api_key: String,
    pub stability_api_key: String,

    // Feature configs (with defaults)
    pub llm: LlmSettings,
    pub stable_audio: StableAudioSettings,
    pub uploads: UploadSettings,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub caption_model: String,
    pub mood_model: String,
    pub api_key_source: ApiKeySource,
}

#[derive(Debug, Clone)]
pub struct StableAudioSettings {
    pub seed: u32,
    pub steps: u32,
    pub cfg_scale: f64,
    pub strength: f64,
    pub output_format: String,
}

impl Default for StableAudioSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            steps: 50,
            cfg_scale: 7.0,
            strength: 1.0,
            output_format: "mp3".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub temp_dir: PathBuf,
    /// Maximum size of one uploaded file, in bytes.
    pub max_upload_size: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present. API keys missing from
    /// the file fall back to environment variables.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // TOML overrides CLI for each field
        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let audio_cache_age_sec = file.audio_cache_age_sec.unwrap_or(cli.audio_cache_age_sec);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        let output_dir = file
            .output_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.output_dir.clone());

        let opencage_api_key = match resolve_key(file.opencage_api_key, "OPENCAGE_API_KEY") {
            Some(key) => key,
            None => bail!("opencage_api_key must be set in the config file or via OPENCAGE_API_KEY"),
        };
        let openweather_api_key = match resolve_key(file.openweather_api_key, "OPENWEATHER_API_KEY")
        {
            Some(key) => key,
            None => {
                bail!("openweather_api_key must be set in the config file or via OPENWEATHER_API_KEY")
            }
        };

        // LLM settings - a key command wins over a literal key
        let llm_file = file.llm.unwrap_or_default();
        let api_key_source = if let Some(command) = llm_file.api_key_command {
            ApiKeySource::Command(command)
        } else if let Some(key) = resolve_key(llm_file.api_key, "OPENAI_API_KEY") {
            ApiKeySource::Static(key)
        } else {
            bail!("an LLM API key must be set via [llm] api_key, [llm] api_key_command or OPENAI_API_KEY");
        };
        let llm = LlmSettings {
            base_url: llm_file
                .base_url
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            caption_model: llm_file
                .caption_model
                .unwrap_or_else(|| DEFAULT_CAPTION_MODEL.to_string()),
            mood_model: llm_file
                .mood_model
                .unwrap_or_else(|| DEFAULT_MOOD_MODEL.to_string()),
            api_key_source,
        };

        // Stable Audio settings - merge file config with defaults
        let sa_file = file.stable_audio.unwrap_or_default();
        let stability_api_key = match resolve_key(sa_file.api_key, "STABILITY_API_KEY") {
            Some(key) => key,
            None => {
                bail!("a Stability API key must be set via [stable_audio] api_key or STABILITY_API_KEY")
            }
        };
        let sa_defaults = StableAudioSettings::default();
        let stable_audio = StableAudioSettings {
            seed: sa_file.seed.unwrap_or(sa_defaults.seed),
            steps: sa_file.steps.unwrap_or(sa_defaults.steps),
            cfg_scale: sa_file.cfg_scale.unwrap_or(sa_defaults.cfg_scale),
            strength: sa_file.strength.unwrap_or(sa_defaults.strength),
            output_format: sa_file
                .output_format
                .unwrap_or_else(|| sa_defaults.output_format.clone()),
        };
        if !matches!(stable_audio.output_format.as_str(), "mp3" | "wav") {
            bail!(
                "Unsupported output_format: {} (expected mp3 or wav)",
                stable_audio.output_format
            );
        }
        if !(0.0..=1.0).contains(&stable_audio.strength) {
            bail!(
                "strength must be between 0.0 and 1.0, got {}",
                stable_audio.strength
            );
        }

        let uploads_file = file.uploads.unwrap_or_default();
        let uploads = UploadSettings {
            temp_dir: uploads_file
                .temp_dir
                .map(PathBuf::from)
                .or_else(|| cli.temp_dir.clone())
                .unwrap_or_else(|| std::env::temp_dir().join("moodsound-uploads")),
            max_upload_size: uploads_file.max_upload_mb.unwrap_or(cli.max_upload_mb) * 1024 * 1024,
        };

        Ok(Self {
            port,
            logging_level,
            audio_cache_age_sec,
            frontend_dir_path,
            output_dir,
            opencage_api_key,
            openweather_api_key,
            stability_api_key,
            llm,
            stable_audio,
            uploads,
        })
    }

    /// Request body limit for the generate route: both uploads plus headroom
    /// for the text fields and multipart framing.
    pub fn max_body_bytes(&self) -> usize {
        (2 * self.uploads.max_upload_size + 1024 * 1024) as usize
    }
}

/// A key from the config file wins over the environment. Blank values count
/// as missing.
fn resolve_key(file_value: Option<String>, env_var: &str) -> Option<String> {
    file_value
        .filter(|key| !key.trim().is_empty())
        .or_else(|| std::env::var(env_var).ok().filter(|key| !key.trim().is_empty()))
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
