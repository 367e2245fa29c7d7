//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own working directories and
//! its own set of fake pipeline collaborators.

use super::constants::*;
use super::fakes::{FakeDescriber, FakeGenerator, FakeResolver, FakeSynthesizer, FakeWeather};
use moodsound_server::server::{server::make_app, RequestsLoggingLevel, ServerConfig};
use moodsound_server::sonification::{SonificationConfig, SonificationManager};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with isolated working directories
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Generator fake, for asserting how the pipeline called it
    pub generator: Arc<FakeGenerator>,

    /// Directory where finished audio lands, for direct filesystem access
    pub output_dir: PathBuf,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a test server whose fake weather lookups always succeed.
    pub async fn spawn() -> Self {
        Self::spawn_with(true).await
    }

    /// Spawns a test server whose fake weather lookups find nothing.
    pub async fn spawn_without_weather() -> Self {
        Self::spawn_with(false).await
    }

    /// Spawns a new test server on a random port
    ///
    /// This function:
    /// 1. Creates temporary upload and output directories
    /// 2. Wires a manager from the canned fakes
    /// 3. Binds to a random port (127.0.0.1:0)
    /// 4. Spawns the server in a background task
    /// 5. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Directory creation fails
    /// - Port binding fails
    /// - Server fails to start
    /// - Server doesn't become ready within timeout
    async fn spawn_with(weather_available: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let uploads_dir = temp_dir.path().join("uploads");
        let output_dir = temp_dir.path().join("audio");

        let generator = Arc::new(FakeGenerator::new());

        let manager = Arc::new(SonificationManager::new(
            Arc::new(FakeResolver),
            Arc::new(FakeWeather {
                available: weather_available,
            }),
            Arc::new(FakeDescriber),
            Arc::new(FakeSynthesizer),
            generator.clone(),
            SonificationConfig {
                temp_dir: uploads_dir,
                output_dir: output_dir.clone(),
                max_upload_size: 1024 * 1024,
            },
        ));
        manager.init().await.expect("Failed to init manager");

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        // Build the app
        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            audio_cache_age_sec: 3600,
            frontend_dir_path: None,
            max_body_bytes: 8 * 1024 * 1024,
        };

        let app = make_app(config, manager).expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        // Wait for server to be ready
        let server = Self {
            base_url: base_url.clone(),
            port,
            generator,
            output_dir,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the stats endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    // Server is ready
                    return;
                }
                _ => {
                    // Server not ready yet, wait and retry
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir contents are cleaned up automatically
    }
}
