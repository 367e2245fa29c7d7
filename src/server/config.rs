use super::RequestsLoggingLevel;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub audio_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    /// Upper bound for incoming request bodies, sized from the upload limit.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8000,
            audio_cache_age_sec: 3600,
            frontend_dir_path: None,
            max_body_bytes: 51 * 1024 * 1024,
        }
    }
}
