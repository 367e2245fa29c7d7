use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodsound_server::captioning::GptSceneDescriber;
use moodsound_server::config::{AppConfig, CliConfig, FileConfig};
use moodsound_server::generation::StableAudioClient;
use moodsound_server::geocoding::OpenCageClient;
use moodsound_server::llm::OpenAIProvider;
use moodsound_server::mood::LlmMoodSynthesizer;
use moodsound_server::server::{run_server, RequestsLoggingLevel, ServerConfig};
use moodsound_server::sonification::{SonificationConfig, SonificationManager};
use moodsound_server::weather::OpenWeatherClient;

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values set there override CLI arguments.
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// The maximum age of served audio in HTTP caches, in seconds.
    #[clap(long, default_value_t = 3600)]
    pub audio_cache_age_sec: usize,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Directory where generated audio files are written.
    #[clap(long, default_value = "audio")]
    pub output_dir: PathBuf,

    /// Directory for temporary uploaded files. Defaults to a directory under
    /// the system temp dir.
    #[clap(long)]
    pub temp_dir: Option<PathBuf>,

    /// Maximum size of one uploaded file, in megabytes.
    #[clap(long, default_value_t = 25)]
    pub max_upload_mb: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };

    let cli_config = CliConfig {
        port: cli_args.port,
        logging_level: cli_args.logging_level.clone(),
        audio_cache_age_sec: cli_args.audio_cache_age_sec,
        frontend_dir_path: cli_args.frontend_dir_path.clone(),
        output_dir: cli_args.output_dir.clone(),
        temp_dir: cli_args.temp_dir.clone(),
        max_upload_mb: cli_args.max_upload_mb,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let location_resolver = Arc::new(OpenCageClient::new(&config.opencage_api_key));
    let weather = Arc::new(OpenWeatherClient::new(&config.openweather_api_key));

    let caption_llm = Arc::new(OpenAIProvider::new(
        &config.llm.base_url,
        &config.llm.caption_model,
        config.llm.api_key_source.clone(),
    ));
    let scene_describer = Arc::new(GptSceneDescriber::new(caption_llm));

    let mood_llm = Arc::new(OpenAIProvider::new(
        &config.llm.base_url,
        &config.llm.mood_model,
        config.llm.api_key_source.clone(),
    ));
    let mood_synthesizer = Arc::new(LlmMoodSynthesizer::new(mood_llm));

    let audio_generator = Arc::new(StableAudioClient::new(
        &config.stability_api_key,
        config.stable_audio.clone(),
    ));

    let manager = Arc::new(SonificationManager::new(
        location_resolver,
        weather,
        scene_describer,
        mood_synthesizer,
        audio_generator,
        SonificationConfig {
            temp_dir: config.uploads.temp_dir.clone(),
            output_dir: config.output_dir.clone(),
            max_upload_size: config.uploads.max_upload_size,
        },
    ));
    manager
        .init()
        .await
        .context("Failed to create working directories")?;

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
        audio_cache_age_sec: config.audio_cache_age_sec,
        frontend_dir_path: config.frontend_dir_path.clone(),
        max_body_bytes: config.max_body_bytes(),
    };

    info!("Ready to serve at port {}!", config.port);
    run_server(server_config, manager).await
}
