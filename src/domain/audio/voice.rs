use super::AudioFormat;

/// Slowest playback rate providers accept
pub const MIN_SPEED: f32 = 0.25;
/// Fastest playback rate providers accept
pub const MAX_SPEED: f32 = 4.0;

/// How speech should be synthesized for every card in a run
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceConfig {
    pub model: String,
    pub voice: String,
    /// Style guidance for the model. `new` turns blank values into `None`.
    pub instructions: Option<String>,
    pub format: AudioFormat,
    pub speed: f32,
}

impl VoiceConfig {
    pub fn new(
        model: impl Into<String>,
        voice: impl Into<String>,
        instructions: Option<String>,
        format: AudioFormat,
        speed: f32,
    ) -> Result<Self, String> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(format!(
                "speed {} is outside the supported range {}..={}",
                speed, MIN_SPEED, MAX_SPEED
            ));
        }

        Ok(Self {
            model: model.into(),
            voice: voice.into(),
            instructions: instructions
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            format,
            speed,
        })
    }
}
