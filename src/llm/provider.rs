use super::types::Message;
use std::time::Duration;
use thiserror::Error;

/// Options controlling a single completion request.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Sampling temperature, 0.0 to 2.0. Lower is more deterministic.
    pub temperature: f32,
    /// Maximum tokens to generate. None lets the provider decide.
    pub max_tokens: Option<u32>,
    /// Ask the provider to return a single JSON object.
    pub json_response: bool,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: None,
            json_response: false,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
}

/// Token accounting as reported by the provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response to a completion request.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub message: Message,
    pub finish_reason: FinishReason,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("request timed out")]
    Timeout,
}

/// A chat completion backend.
///
/// Implementations are constructed once at startup and shared behind an Arc,
/// one instance per configured model.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Model identifier this provider was configured with.
    fn model(&self) -> &str;

    /// Send a chat completion request.
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError>;

    /// Cheap reachability check against the provider.
    async fn health_check(&self) -> Result<(), LlmError>;
}
