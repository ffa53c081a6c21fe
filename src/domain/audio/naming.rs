use super::AudioFormat;
use crate::domain::text::{derive_identifier_fragment, DEFAULT_FALLBACK_FRAGMENT};

/// Number of hex characters of the text digest kept in filenames
const HASH_CHARS: usize = 8;

/// Parts of the audio filename that are not derived from the card text
#[derive(Debug, Clone, PartialEq)]
pub struct NamingConfig {
    /// Leading token, usually the language of the cards
    pub prefix: String,
    /// Fragment used when the text has no usable words
    pub fallback_fragment: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            prefix: "swedish".to_string(),
            fallback_fragment: DEFAULT_FALLBACK_FRAGMENT.to_string(),
        }
    }
}

/// Deterministic media filename for a card's source text.
///
/// Shape: `<prefix>_<fragment>_<hash>.<ext>`. The hash is the first eight hex
/// digits of the MD5 of the raw text (markup included); the fragment comes
/// from the sanitized text. Identical text always yields the same name.
pub fn derive_filename(source_text: &str, format: AudioFormat, naming: &NamingConfig) -> String {
    let fragment = derive_identifier_fragment(source_text, &naming.fallback_fragment);
    let digest = format!("{:x}", md5::compute(source_text.as_bytes()));

    format!(
        "{}_{}_{}.{}",
        naming.prefix,
        fragment,
        &digest[..HASH_CHARS],
        format.extension()
    )
}

/// Field value that makes Anki play the stored file
pub fn audio_tag(filename: &str) -> String {
    format!("[sound:{}]", filename)
}
