//! Sonification HTTP routes.
//!
//! - POST /generate - run the pipeline on a multipart form
//! - GET /audio/{filename} - serve a generated file from the output directory

use axum::{
    body::Body,
    extract::{multipart::Field, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use super::http_layers::http_cache;
use super::state::{GuardedSonificationManager, ServerState};
use crate::generation::GenerationMode;
use crate::sonification::{ErrorKind, MediaUpload, SonificationOutcome, SonificationRequest};

/// Kind reported when the form itself cannot be parsed, before the pipeline runs.
const INVALID_REQUEST_KIND: &str = "INVALID_REQUEST";

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub location: String,
    pub image_caption: String,
    pub weather_summary: String,
    pub mood_keywords: Vec<String>,
    pub summary: String,
    pub prompt: String,
    pub mode: GenerationMode,
    pub audio_url: String,
}

impl GenerateResponse {
    fn from_outcome(outcome: SonificationOutcome) -> Self {
        Self {
            location: outcome.location,
            image_caption: outcome.image_caption,
            weather_summary: outcome.weather_summary,
            mood_keywords: outcome.mood_keywords,
            summary: outcome.summary,
            prompt: outcome.prompt,
            mode: outcome.mode,
            audio_url: format!("/audio/{}", outcome.audio_filename),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

fn error_response(status: StatusCode, kind: &str, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: ErrorBody {
                kind: kind.to_string(),
                message,
            },
        }),
    )
        .into_response()
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidLocation => StatusCode::BAD_REQUEST,
        ErrorKind::WeatherUnavailable => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// Form Parsing
// =============================================================================

async fn read_upload(field: Field<'_>, name: &str) -> Result<Option<MediaUpload>, String> {
    let filename = field
        .file_name()
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("{}.bin", name));

    let data = field
        .bytes()
        .await
        .map_err(|e| format!("unreadable {} upload: {}", name, e))?;

    // Browsers send an empty file part when the input was left blank.
    if data.is_empty() {
        return Ok(None);
    }

    Ok(Some(MediaUpload::new(filename, data.to_vec())))
}

async fn parse_generate_form(mut multipart: Multipart) -> Result<SonificationRequest, String> {
    let mut request = SonificationRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("unreadable multipart form: {}", e))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "location" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("unreadable location field: {}", e))?;
                if !value.trim().is_empty() {
                    request.location = Some(value);
                }
            }
            "journal" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("unreadable journal field: {}", e))?;
                if !value.trim().is_empty() {
                    request.journal = Some(value);
                }
            }
            "duration" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("unreadable duration field: {}", e))?;
                let value = value.trim();
                if !value.is_empty() {
                    request.duration_secs = value.parse::<u32>().map_err(|_| {
                        format!("duration must be a whole number of seconds, got {:?}", value)
                    })?;
                }
            }
            "image" => {
                request.image = read_upload(field, "image").await?;
            }
            "reference_audio" => {
                request.reference_audio = read_upload(field, "reference_audio").await?;
            }
            _ => {}
        }
    }

    Ok(request)
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /generate - multipart form in, generated audio reference out
async fn generate(
    State(manager): State<GuardedSonificationManager>,
    multipart: Multipart,
) -> Response {
    let request = match parse_generate_form(multipart).await {
        Ok(request) => request,
        Err(message) => {
            debug!("rejected generate form: {}", message);
            return error_response(StatusCode::BAD_REQUEST, INVALID_REQUEST_KIND, message);
        }
    };

    match manager.handle(request).await {
        Ok(outcome) => Json(GenerateResponse::from_outcome(outcome)).into_response(),
        Err(e) => error_response(status_for(e.kind()), e.kind().as_str(), e.to_string()),
    }
}

/// GET /audio/{filename} - serve a generated audio file
async fn get_audio(
    State(manager): State<GuardedSonificationManager>,
    Path(filename): Path<String>,
) -> Response {
    // The route matches a single segment, but the decoded value can still
    // smuggle separators or point at hidden files.
    if filename.contains('/') || filename.contains('\\') || filename.starts_with('.') {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = manager.output_dir().join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(_) => {
            debug!("audio file {} not available", filename);
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let content_type = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .body(Body::from(bytes))
        .unwrap()
}

// =============================================================================
// Router Construction
// =============================================================================

/// Build the generation route, with a body limit sized for two uploads.
pub fn sonification_routes(max_body_bytes: usize) -> Router<ServerState> {
    Router::new()
        .route("/generate", post(generate))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}

/// Build the audio file route, with cache headers on responses.
pub fn audio_routes(audio_cache_age_sec: usize) -> Router<ServerState> {
    Router::new()
        .route("/audio/{filename}", get(get_audio))
        .layer(middleware::from_fn_with_state(
            audio_cache_age_sec,
            http_cache,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sonification::SonificationError;

    fn outcome() -> SonificationOutcome {
        SonificationOutcome {
            location: "25.0340, 121.5645".to_string(),
            image_caption: String::new(),
            weather_summary: "Taipei | 28°C | clear sky | Humidity 70% | Wind 2.1 m/s"
                .to_string(),
            mood_keywords: vec!["bright".to_string(), "open".to_string(), "calm".to_string()],
            summary: "A clear day".to_string(),
            prompt: "Format: Solo | Genre: Ambient".to_string(),
            mode: GenerationMode::TextToAudio,
            audio_filename: "abc123.mp3".to_string(),
        }
    }

    #[test]
    fn test_audio_url_points_at_audio_route() {
        let response = GenerateResponse::from_outcome(outcome());

        assert_eq!(response.audio_url, "/audio/abc123.mp3");
        assert_eq!(response.location, "25.0340, 121.5645");
    }

    #[test]
    fn test_mode_serializes_as_tag() {
        let json = serde_json::to_value(GenerateResponse::from_outcome(outcome())).unwrap();

        assert_eq!(json["mode"], "text-to-audio");
        assert_eq!(json["audio_url"], "/audio/abc123.mp3");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(SonificationError::InvalidLocation("x".to_string()).kind()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(SonificationError::WeatherUnavailable.kind()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(ErrorKind::GenerationFailure),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_for(ErrorKind::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_body_shape() {
        let json = serde_json::to_value(ErrorResponse {
            error: ErrorBody {
                kind: "INVALID_LOCATION".to_string(),
                message: "could not resolve".to_string(),
            },
        })
        .unwrap();

        assert_eq!(json["error"]["kind"], "INVALID_LOCATION");
        assert_eq!(json["error"]["message"], "could not resolve");
    }
}
