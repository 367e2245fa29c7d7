//! MoodSound Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod captioning;
pub mod config;
pub mod generation;
pub mod geocoding;
pub mod llm;
pub mod mood;
pub mod server;
pub mod sonification;
pub mod weather;

// Re-export commonly used types for convenience
pub use config::{AppConfig, CliConfig, FileConfig};
pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
pub use sonification::{SonificationConfig, SonificationManager};
