//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When canned collaborator responses change, update only this file.

// ============================================================================
// Canned Locations
// ============================================================================

/// Location text the fake resolver knows.
pub const TEST_LOCATION: &str = "Taipei 101";

/// Location text the fake resolver answers "unresolved" to.
pub const UNRESOLVED_LOCATION: &str = "Nowhere Land";

/// Label produced for the resolved test coordinates.
pub const RESOLVED_LOCATION_LABEL: &str = "25.0340, 121.5645";

/// Label produced when no location text was sent.
pub const NETWORK_ORIGIN_LABEL: &str = "Detected via IP";

// ============================================================================
// Canned Collaborator Outputs
// ============================================================================

/// Bytes the fake generator writes. ID3 prefix so MIME sniffing sees an mp3.
pub const FAKE_AUDIO: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00fake-mp3-payload";

/// Summary line the canned Taipei snapshot renders to.
pub const FAKE_WEATHER_SUMMARY: &str =
    "Taipei | 28°C | clear sky | Humidity 70% | Wind 2.1 m/s";

/// Caption the fake scene describer returns for any image.
pub const FAKE_CAPTION: &str =
    "A narrow street glistening after rain, lit by warm shop windows.";

/// Mood summary the fake synthesizer returns.
pub const FAKE_SUMMARY: &str = "A clear, bright afternoon with a light breeze.";

/// Generation prompt the fake synthesizer returns.
pub const FAKE_PROMPT: &str =
    "Format: Solo | Genre: Ambient | Subgenre: Drone | Instruments: Synth pads | Moods: bright, open, calm | BPM: 60";

/// Mood keywords the fake synthesizer returns.
pub const FAKE_MOOD_KEYWORDS: [&str; 3] = ["bright", "open", "calm"];

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
