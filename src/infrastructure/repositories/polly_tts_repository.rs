use super::tts_repository::TtsRepository;
use crate::domain::audio::{AudioFormat, VoiceConfig};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, TextType, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 billed characters per request
const MAX_INPUT_CHARS: usize = 3000;

/// AWS Polly implementation of TTS repository
///
/// `VoiceConfig::voice` is used as the Polly voice id (e.g. `Elin` for
/// Swedish). The model and instructions have no Polly equivalent.
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    fn output_format(format: AudioFormat) -> Result<OutputFormat, String> {
        match format {
            AudioFormat::Mp3 => Ok(OutputFormat::Mp3),
            AudioFormat::Pcm => Ok(OutputFormat::Pcm),
            other => Err(format!("AWS Polly cannot produce {} audio", other)),
        }
    }

    /// Call AWS Polly to synthesize a single text
    async fn call_polly(&self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>, String> {
        let output_format = Self::output_format(voice.format)?;
        let voice_id = VoiceId::from(voice.voice.as_str());
        let engine = Engine::Neural;

        if voice.instructions.is_some() {
            tracing::debug!("AWS Polly does not support style instructions, ignoring them");
        }

        tracing::info!(
            voice_id = ?voice_id,
            engine = ?engine,
            output_format = ?output_format,
            speed = voice.speed,
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(to_ssml(text, voice.speed))
            .text_type(TextType::Ssml)
            .voice_id(voice_id.clone())
            .output_format(output_format)
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    voice_id = ?voice_id,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                format!("AWS Polly error: {:?}", e)
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "Audio stream collected successfully"
        );

        Ok(audio_bytes)
    }
}

/// Wrap text in SSML so the playback rate can be applied
fn to_ssml(text: &str, speed: f32) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;");
    let rate = (speed * 100.0).round() as u32;

    format!("<speak><prosody rate=\"{}%\">{}</prosody></speak>", rate, escaped)
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>, String> {
        let char_count = text.chars().count();
        if char_count > MAX_INPUT_CHARS {
            return Err(format!(
                "Text has {} characters, AWS Polly accepts at most {}",
                char_count, MAX_INPUT_CHARS
            ));
        }

        let start_time = std::time::Instant::now();
        let audio_data = self.call_polly(text, voice).await?;

        tracing::info!(
            provider = "polly",
            voice = %voice.voice,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = char_count,
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}
