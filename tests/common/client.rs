//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all moodsound-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use std::time::Duration;

/// HTTP test client for the sonification endpoints
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // Generation Endpoint
    // ========================================================================

    /// POST /generate with an arbitrary multipart form
    pub async fn generate(&self, form: Form) -> Response {
        self.client
            .post(format!("{}/generate", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Generate request failed")
    }

    /// POST /generate with only text fields
    ///
    /// `duration` is sent verbatim, so tests can submit non-numeric values.
    pub async fn generate_text(
        &self,
        location: Option<&str>,
        journal: Option<&str>,
        duration: Option<&str>,
    ) -> Response {
        let mut form = Form::new();
        if let Some(location) = location {
            form = form.text("location", location.to_string());
        }
        if let Some(journal) = journal {
            form = form.text("journal", journal.to_string());
        }
        if let Some(duration) = duration {
            form = form.text("duration", duration.to_string());
        }
        self.generate(form).await
    }

    /// POST /generate with an image attachment
    pub async fn generate_with_image(&self, location: &str, image: Vec<u8>) -> Response {
        let form = Form::new()
            .text("location", location.to_string())
            .part("image", Part::bytes(image).file_name("scene.jpg"));
        self.generate(form).await
    }

    /// POST /generate with a reference audio attachment
    pub async fn generate_with_reference(&self, location: &str, audio: Vec<u8>) -> Response {
        let form = Form::new()
            .text("location", location.to_string())
            .part(
                "reference_audio",
                Part::bytes(audio).file_name("reference.mp3"),
            );
        self.generate(form).await
    }

    // ========================================================================
    // Audio Endpoint
    // ========================================================================

    /// GET /audio/{filename}
    pub async fn get_audio(&self, filename: &str) -> Response {
        self.client
            .get(format!("{}/audio/{}", self.base_url, filename))
            .send()
            .await
            .expect("Get audio request failed")
    }

    /// GET an absolute path, e.g. the audio_url of a generate response
    pub async fn get_path(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Get path request failed")
    }

    // ========================================================================
    // Health Check / System Endpoints
    // ========================================================================

    /// GET /
    pub async fn get_stats(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Get stats request failed")
    }
}
