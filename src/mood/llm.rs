//! Mood interpretation backed by a chat model.

use super::{MoodInterpretation, MoodSynthesizer, SynthesisError};
use crate::llm::{CompletionOptions, LlmProvider, Message};
use crate::weather::WeatherSnapshot;
use std::sync::Arc;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are a music prompt designer. Interpret weather data and \
    optionally a journal entry to suggest a music generation prompt that reflects emotional and \
    atmospheric conditions.";

pub struct LlmMoodSynthesizer {
    llm: Arc<dyn LlmProvider>,
}

impl LlmMoodSynthesizer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait::async_trait]
impl MoodSynthesizer for LlmMoodSynthesizer {
    async fn interpret(
        &self,
        weather: &WeatherSnapshot,
        journal: &str,
        image_caption: &str,
    ) -> Result<MoodInterpretation, SynthesisError> {
        let messages = [
            Message::system(SYSTEM_PROMPT),
            Message::user(build_user_prompt(weather, journal, image_caption)),
        ];
        let options = CompletionOptions {
            json_response: true,
            ..Default::default()
        };

        debug!(model = self.llm.model(), city = %weather.city, "interpreting mood");
        let response = self.llm.complete(&messages, &options).await?;
        parse_interpretation(&response.message.text())
    }
}

fn build_user_prompt(weather: &WeatherSnapshot, journal: &str, image_caption: &str) -> String {
    let mut prompt = format!(
        "Location: {}\n\
         Temperature: {} °C\n\
         Weather: {} ({})\n\
         Wind Speed: {} m/s\n\
         Humidity: {}%\n",
        weather.city,
        weather.temperature,
        weather.weather_main,
        weather.weather_desc,
        weather.wind_speed,
        weather.humidity,
    );

    if !journal.trim().is_empty() {
        prompt.push_str(&format!("\nJournal entry:\n{}\n", journal.trim()));
    }
    if !image_caption.trim().is_empty() {
        prompt.push_str(&format!("\nImage description:\n{}\n", image_caption.trim()));
    }

    prompt.push_str(
        "\nPlease reflect on the emotional and atmospheric tone that arises from this \
         combination of weather, personal reflection, and visual context.\n\
         \n\
         Answer with a single JSON object containing:\n\
         - \"location\": the place this interpretation is about\n\
         - \"summary\": a short, poetic or natural language summary that captures the mood and \
         feel of the day\n\
         - \"mood_keywords\": three evocative mood keywords that summarize this overall feeling\n\
         - \"suggested_prompt\": a creative music generation prompt in the style of Stable \
         Audio. Use rich musical language to describe the sound. You may follow this structure \
         for clarity, but feel free to adjust creatively:\n\
         \n\
         Format: [Solo/Band/Orchestra] |\n\
         Genre: [e.g., Ambient, Chillout, Hip Hop] |\n\
         Subgenre: [optional] |\n\
         Instruments: [e.g., synth pads, acoustic guitar, drum machine] |\n\
         Moods: [mood1, mood2, mood3] |\n\
         BPM: [optional] |\n\
         Additional descriptors: [optional, e.g., 'lo-fi texture', 'warm analog vibe']\n\
         \n\
         The final music prompt should feel like a sonic interpretation of the day's atmosphere.",
    );

    prompt
}

/// The model is asked for bare JSON but some providers still wrap the object
/// in a markdown fence.
fn parse_interpretation(text: &str) -> Result<MoodInterpretation, SynthesisError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();
    serde_json::from_str(body).map_err(|e| SynthesisError::MalformedOutput(e.to_string()))
}
