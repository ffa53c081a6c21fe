use crate::domain::audio::{AudioFormat, NamingConfig, VoiceConfig};
use crate::domain::batch::BatchOptions;
use crate::domain::card::FieldNames;
use crate::error::{AppError, AppResult};
use std::env;
use std::path::PathBuf;

const DEFAULT_INSTRUCTIONS: &str =
    "Speak clearly and at a moderate pace. I'm learning Swedish. Focus on pronunciation.";

#[derive(Debug, Clone)]
pub struct Config {
    pub anki_connect_url: String,
    pub media_path: PathBuf,
    pub deck_name: Option<String>,
    pub fields: FieldNames,
    pub naming: NamingConfig,
    // TTS
    pub tts_provider: TtsProvider,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub voice: VoiceConfig,
    pub aws_region: String,
    // Run behaviour
    pub test_mode: bool,
    pub debug_mode: bool,
    pub log_format: LogFormat,
    pub http_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TtsProvider {
    OpenAi,
    Polly,
}

impl TtsProvider {
    /// Voice used when `TTS_VOICE` is not set
    pub fn default_voice(&self) -> &'static str {
        match self {
            Self::OpenAi => "alloy",
            // Swedish neural voice
            Self::Polly => "Elin",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Unset and blank are treated the same
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let var_or = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());
        let flag = |name: &str| {
            var(name)
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false)
        };

        let tts_provider = match var_or("TTS_PROVIDER", "openai").to_lowercase().as_str() {
            "openai" => TtsProvider::OpenAi,
            "polly" => TtsProvider::Polly,
            other => {
                return Err(AppError::Config(format!(
                    "TTS_PROVIDER must be 'openai' or 'polly', got '{}'",
                    other
                )))
            }
        };

        let openai_api_key = var("OPENAI_API_KEY");
        if tts_provider == TtsProvider::OpenAi && openai_api_key.is_none() {
            return Err(AppError::Config("OPENAI_API_KEY is not set".to_string()));
        }

        let media_path = var("ANKI_MEDIA_PATH")
            .map(PathBuf::from)
            .ok_or_else(|| AppError::Config("ANKI_MEDIA_PATH is not set".to_string()))?;

        let format: AudioFormat = var_or("TTS_FORMAT", "mp3")
            .parse()
            .map_err(AppError::Config)?;

        let speed: f32 = var_or("TTS_SPEED", "0.9")
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("TTS_SPEED is not a number: {}", e)))?;

        // An explicitly empty TTS_INSTRUCTIONS disables the default guidance
        let instructions = lookup("TTS_INSTRUCTIONS").unwrap_or_else(|| DEFAULT_INSTRUCTIONS.to_string());

        let voice = VoiceConfig::new(
            var_or("TTS_MODEL", "gpt-4o-mini-tts"),
            var_or("TTS_VOICE", tts_provider.default_voice()),
            Some(instructions),
            format,
            speed,
        )
        .map_err(AppError::Config)?;

        let defaults = FieldNames::default();
        let naming_defaults = NamingConfig::default();

        let config = Config {
            anki_connect_url: var_or("ANKI_CONNECT_URL", "http://localhost:8765"),
            media_path,
            deck_name: var("DECK_NAME"),
            fields: FieldNames {
                source: var_or("SOURCE_FIELD", &defaults.source),
                audio: var_or("AUDIO_FIELD", &defaults.audio),
            },
            naming: NamingConfig {
                prefix: var_or("FILENAME_PREFIX", &naming_defaults.prefix),
                fallback_fragment: var_or("FALLBACK_FRAGMENT", &naming_defaults.fallback_fragment),
            },
            tts_provider,
            openai_api_key,
            openai_base_url: var_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            voice,
            aws_region: var_or("AWS_REGION", "eu-north-1"),
            test_mode: flag("TEST_MODE"),
            debug_mode: flag("DEBUG_MODE"),
            log_format: match var_or("LOG_FORMAT", "pretty").to_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            http_timeout_secs: var_or("HTTP_TIMEOUT_SECS", "120")
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("HTTP_TIMEOUT_SECS is invalid: {}", e)))?,
        };

        Ok(config)
    }

    /// Settings handed to the batch service for one run
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            fields: self.fields.clone(),
            naming: self.naming.clone(),
            voice: self.voice.clone(),
            deck_name: self.deck_name.clone(),
            single_item: self.test_mode,
            diagnostics: self.debug_mode,
        }
    }
}
