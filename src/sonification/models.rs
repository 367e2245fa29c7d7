//! Request and outcome models.

use crate::generation::GenerationMode;
use serde::Serialize;

/// Hard ceiling on requested audio duration, in seconds.
pub const MAX_DURATION_SECS: u32 = 180;

/// Duration used when a request does not ask for one.
pub const DEFAULT_DURATION_SECS: u32 = 20;

/// Location label used when weather was looked up by network origin.
pub const NETWORK_ORIGIN_LABEL: &str = "Detected via IP";

/// An uploaded file travelling with one request.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

impl MediaUpload {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SonificationRequest {
    /// Free text place name. Absent or blank means "use network origin".
    pub location: Option<String>,
    pub journal: Option<String>,
    /// Requested audio length. Values above [MAX_DURATION_SECS] are clamped.
    pub duration_secs: u32,
    pub image: Option<MediaUpload>,
    pub reference_audio: Option<MediaUpload>,
}

impl Default for SonificationRequest {
    fn default() -> Self {
        Self {
            location: None,
            journal: None,
            duration_secs: DEFAULT_DURATION_SECS,
            image: None,
            reference_audio: None,
        }
    }
}

/// Everything a completed request produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SonificationOutcome {
    /// "lat, lon" of the resolved place, or [NETWORK_ORIGIN_LABEL].
    pub location: String,
    /// Empty when no image was uploaded.
    pub image_caption: String,
    pub weather_summary: String,
    pub mood_keywords: Vec<String>,
    pub summary: String,
    /// The prompt the audio was generated from.
    pub prompt: String,
    pub mode: GenerationMode,
    /// Name of the generated file inside the output directory.
    pub audio_filename: String,
}
