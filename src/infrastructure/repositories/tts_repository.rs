use crate::domain::audio::VoiceConfig;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (OpenAI, AWS Polly)
///
/// Implementations are responsible for:
/// - Translating the voice configuration into provider parameters
/// - Returning the audio exactly as encoded by the provider
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech with the given voice settings
    ///
    /// Returns the raw audio bytes in `voice.format`
    ///
    /// # Arguments
    /// * `text` - The cleaned text to synthesize (no HTML, normalized whitespace)
    /// * `voice` - Model, voice preset, style guidance, format and speed
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(&self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>, String>;
}
