pub mod format;
pub mod naming;
pub mod voice;

pub use format::AudioFormat;
pub use naming::{audio_tag, derive_filename, NamingConfig};
pub use voice::VoiceConfig;

/// Synthesized audio together with the media filename it will be stored under
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl AudioArtifact {
    /// Name the audio after the raw card text it was generated from
    pub fn new(
        source_text: &str,
        bytes: Vec<u8>,
        format: AudioFormat,
        naming: &NamingConfig,
    ) -> Self {
        Self {
            filename: derive_filename(source_text, format, naming),
            bytes,
        }
    }
}
