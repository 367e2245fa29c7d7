//! Mood interpretation.
//!
//! Weather, an optional journal entry and an optional image caption are
//! combined into a mood reading and a music generation prompt.

mod llm;

pub use llm::LlmMoodSynthesizer;

use crate::weather::WeatherSnapshot;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the interpreter concluded about the moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodInterpretation {
    /// The place this interpretation is about.
    pub location: String,
    /// Short natural language summary of the mood of the day.
    pub summary: String,
    /// Evocative keywords, typically three.
    pub mood_keywords: Vec<String>,
    /// Music generation prompt in Stable Audio style.
    pub suggested_prompt: String,
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("mood model call failed: {0}")]
    Llm(#[from] crate::llm::LlmError),

    #[error("mood model returned malformed output: {0}")]
    MalformedOutput(String),
}

/// Turns ambient context into a mood reading and a music prompt.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait::async_trait]
pub trait MoodSynthesizer: Send + Sync {
    /// `journal` and `image_caption` may be empty. Weather alone is enough
    /// input for an interpretation.
    async fn interpret(
        &self,
        weather: &WeatherSnapshot,
        journal: &str,
        image_caption: &str,
    ) -> Result<MoodInterpretation, SynthesisError>;
}
