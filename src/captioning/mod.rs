//! Image captioning.
//!
//! An uploaded image is turned into a single descriptive sentence that later
//! feeds into the mood interpretation alongside weather and journal text.

mod gpt;

pub use gpt::GptSceneDescriber;

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("caption model call failed: {0}")]
    Llm(#[from] crate::llm::LlmError),

    #[error("caption model returned no usable text")]
    EmptyCaption,
}

/// Describes the visual content of an image file.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait::async_trait]
pub trait SceneDescriber: Send + Sync {
    /// One complete sentence describing what the image shows.
    async fn describe(&self, image: &Path) -> Result<String, CaptionError>;
}
