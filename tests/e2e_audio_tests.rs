//! End-to-end tests for serving generated audio
//!
//! Tests the audio endpoint, its cache headers and its filename handling,
//! plus the stats route used for health checks.

mod common;

use common::{TestClient, TestServer, FAKE_AUDIO, TEST_LOCATION};
use reqwest::StatusCode;

#[tokio::test]
async fn test_generated_audio_is_served() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.generate_text(Some(TEST_LOCATION), None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: serde_json::Value = response.json().await.unwrap();
    let audio_url = outcome["audio_url"].as_str().unwrap();

    let response = client.get_path(audio_url).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Content type comes from sniffing the file, not from the extension
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(content_type, "audio/mpeg");

    let cache_control = response
        .headers()
        .get("cache-control")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(cache_control, "max-age=3600");

    let bytes = response.bytes().await.unwrap();
    assert_eq!(&bytes[..], FAKE_AUDIO);
}

#[tokio::test]
async fn test_missing_audio_returns_404() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_audio("no-such-file.mp3").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hidden_files_are_not_served() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    tokio::fs::write(server.output_dir.join(".secret"), b"keys")
        .await
        .unwrap();

    let response = client.get_audio(".secret").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_path_traversal_is_rejected() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    // A file next to the output dir must stay out of reach
    let escape_path = server.output_dir.parent().unwrap().join("escape.mp3");
    tokio::fs::write(&escape_path, FAKE_AUDIO).await.unwrap();

    let response = client.get_audio("..%2Fescape.mp3").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Stats Route Tests
// =============================================================================

#[tokio::test]
async fn test_stats_route_reports_uptime_and_hash() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_stats().await;

    assert_eq!(response.status(), StatusCode::OK);

    let stats: serde_json::Value = response.json().await.unwrap();
    assert!(stats["uptime"].as_str().unwrap().starts_with("0d"));
    assert!(!stats["hash"].as_str().unwrap().is_empty());
}
