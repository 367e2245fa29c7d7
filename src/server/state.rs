use axum::extract::FromRef;

use crate::sonification::SonificationManager;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedSonificationManager = Arc<SonificationManager>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub sonification_manager: GuardedSonificationManager,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedSonificationManager {
    fn from_ref(input: &ServerState) -> Self {
        input.sonification_manager.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
