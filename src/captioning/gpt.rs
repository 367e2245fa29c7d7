//! Captioning backed by a vision-capable chat model.

use super::{CaptionError, SceneDescriber};
use crate::llm::{CompletionOptions, LlmProvider, Message};
use base64::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are an expert image captioning agent. A user has uploaded an \
    image that reflects their current context or environment. Your task is to describe the image \
    in one complete, natural sentence. Focus entirely on what can be visually observed. Include \
    key visual elements such as objects, setting, people, actions, posture, lighting, colors, \
    spatial layout, and notable textures. Do not infer the user's emotions or intentions—just \
    describe the image with precise, concrete detail. Your description will be combined with \
    other user inputs to create an expressive audio experience.";

pub struct GptSceneDescriber {
    llm: Arc<dyn LlmProvider>,
}

impl GptSceneDescriber {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait::async_trait]
impl SceneDescriber for GptSceneDescriber {
    async fn describe(&self, image: &Path) -> Result<String, CaptionError> {
        let bytes = tokio::fs::read(image).await?;
        debug!(
            image = %image.display(),
            bytes = bytes.len(),
            model = self.llm.model(),
            "captioning image"
        );

        let messages = [
            Message::system(SYSTEM_PROMPT),
            Message::user_image(to_data_url(&bytes)),
        ];
        let response = self
            .llm
            .complete(&messages, &CompletionOptions::default())
            .await?;

        let caption = response.message.text().trim().to_string();
        if caption.is_empty() {
            return Err(CaptionError::EmptyCaption);
        }
        Ok(caption)
    }
}

/// Inlines image bytes as a base64 data URL, sniffing the MIME type from the
/// content rather than trusting the uploaded filename.
fn to_data_url(bytes: &[u8]) -> String {
    let mime_type = infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{};base64,{}", mime_type, BASE64_STANDARD.encode(bytes))
}
