use super::tts_repository::TtsRepository;
use crate::domain::audio::VoiceConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI has a limit of 4096 characters per request
const MAX_INPUT_CHARS: usize = 4096;

/// Request body for POST /audio/speech
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    // Some models reject an empty string here, so the key is left out instead
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
    response_format: &'a str,
    speed: f32,
}

impl<'a> SpeechRequest<'a> {
    fn new(text: &'a str, voice: &'a VoiceConfig) -> Self {
        Self {
            model: &voice.model,
            voice: &voice.voice,
            input: text,
            instructions: voice
                .instructions
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty()),
            response_format: voice.format.as_str(),
            speed: voice.speed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiTtsRepository {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.base_url)
    }

    /// Call OpenAI TTS API for a single text
    async fn call_openai(&self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>, String> {
        tracing::info!(
            model = %voice.model,
            voice = %voice.voice,
            format = %voice.format,
            speed = voice.speed,
            has_instructions = voice.instructions.is_some(),
            text_length = text.len(),
            "Calling OpenAI TTS API"
        );

        let request = SpeechRequest::new(text, voice);

        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("OpenAI TTS request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiError>(&body) {
                Ok(api_error) => api_error.error.message,
                Err(_) => format!("HTTP {}: {}", status, body),
            };

            tracing::error!(
                status = status.as_u16(),
                error = %message,
                model = %voice.model,
                voice = %voice.voice,
                "OpenAI TTS API call failed"
            );
            return Err(format!("OpenAI TTS error: {}", message));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read OpenAI audio: {}", e))?
            .to_vec();

        tracing::debug!(
            audio_size = audio_bytes.len(),
            "OpenAI TTS audio received successfully"
        );

        Ok(audio_bytes)
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    async fn synthesize(&self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>, String> {
        let char_count = text.chars().count();
        if char_count > MAX_INPUT_CHARS {
            return Err(format!(
                "Text has {} characters, OpenAI accepts at most {}",
                char_count, MAX_INPUT_CHARS
            ));
        }

        let start_time = std::time::Instant::now();
        let audio_data = self.call_openai(text, voice).await?;

        tracing::info!(
            provider = "openai",
            model = %voice.model,
            voice = %voice.voice,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = char_count,
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}
