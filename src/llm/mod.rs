mod openai;
mod provider;
pub mod types;

pub use openai::{ApiKeySource, OpenAIProvider};
pub use provider::{
    CompletionOptions, CompletionResponse, FinishReason, LlmError, LlmProvider, TokenUsage,
};
pub use types::{ContentPart, Message, MessageContent, MessageRole};

#[cfg(feature = "mock")]
pub use provider::MockLlmProvider;
