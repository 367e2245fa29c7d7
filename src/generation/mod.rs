//! Audio generation.

mod stable_audio;

pub use stable_audio::StableAudioClient;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// How the audio backend is driven for one request.
///
/// The mode follows from whether a reference audio was uploaded, nothing
/// else. Callers decide it once per request, before any generation work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    TextToAudio,
    AudioToAudio,
}

impl GenerationMode {
    pub fn for_reference(has_reference_audio: bool) -> Self {
        if has_reference_audio {
            GenerationMode::AudioToAudio
        } else {
            GenerationMode::TextToAudio
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::TextToAudio => "text-to-audio",
            GenerationMode::AudioToAudio => "audio-to-audio",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "text-to-audio" => Some(GenerationMode::TextToAudio),
            "audio-to-audio" => Some(GenerationMode::AudioToAudio),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("generation backend answered {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("audio file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("generation timed out")]
    Timeout,
}

/// Produces an audio file from a prompt, optionally shaped by a reference
/// recording.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait::async_trait]
pub trait AudioGenerator: Send + Sync {
    /// File extension of generated audio, e.g. "mp3".
    fn output_format(&self) -> &str;

    /// Generate audio from the prompt alone and write it to `dest`.
    async fn from_text(
        &self,
        prompt: &str,
        duration_secs: u32,
        dest: &Path,
    ) -> Result<(), GenerationError>;

    /// Generate audio guided by an existing recording and write it to `dest`.
    async fn from_reference(
        &self,
        prompt: &str,
        reference: &Path,
        duration_secs: u32,
        dest: &Path,
    ) -> Result<(), GenerationError>;
}
