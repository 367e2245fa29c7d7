//! Ambient context to generated audio.
//!
//! One request flows through location resolution, weather lookup, optional
//! image captioning, mood interpretation and audio generation. Uploaded media
//! lives in a per-request temp directory that is removed once the request is
//! over, no matter how it ended.

mod assets;
mod manager;
mod models;

pub use assets::{AssetStore, AssetStoreError};
pub use manager::{SonificationConfig, SonificationManager};
pub use models::{
    MediaUpload, SonificationOutcome, SonificationRequest, DEFAULT_DURATION_SECS,
    MAX_DURATION_SECS, NETWORK_ORIGIN_LABEL,
};

use crate::captioning::CaptionError;
use crate::generation::GenerationError;
use crate::geocoding::GeocodeError;
use crate::mood::SynthesisError;
use thiserror::Error;

/// Failure classes exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidLocation,
    WeatherUnavailable,
    CaptionFailure,
    SynthesisFailure,
    GenerationFailure,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidLocation => "INVALID_LOCATION",
            ErrorKind::WeatherUnavailable => "WEATHER_UNAVAILABLE",
            ErrorKind::CaptionFailure => "CAPTION_FAILURE",
            ErrorKind::SynthesisFailure => "SYNTHESIS_FAILURE",
            ErrorKind::GenerationFailure => "GENERATION_FAILURE",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

#[derive(Debug, Error)]
pub enum SonificationError {
    /// The requested place did not resolve to coordinates.
    #[error("could not resolve location: {0}")]
    InvalidLocation(String),

    /// No weather snapshot could be obtained for the request.
    #[error("weather is currently unavailable")]
    WeatherUnavailable,

    #[error(transparent)]
    Caption(#[from] CaptionError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The geocoding backend failed, as opposed to answering "no match".
    #[error("location lookup failed: {0}")]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Assets(#[from] AssetStoreError),
}

impl SonificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SonificationError::InvalidLocation(_) => ErrorKind::InvalidLocation,
            SonificationError::WeatherUnavailable => ErrorKind::WeatherUnavailable,
            SonificationError::Caption(_) => ErrorKind::CaptionFailure,
            SonificationError::Synthesis(_) => ErrorKind::SynthesisFailure,
            SonificationError::Generation(_) => ErrorKind::GenerationFailure,
            SonificationError::Geocode(_) | SonificationError::Assets(_) => ErrorKind::Internal,
        }
    }
}
