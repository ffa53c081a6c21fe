use crate::error::{AppError, AppResult};
use reqwest::Client;
use std::time::Duration;

/// Shared client for AnkiConnect and OpenAI calls
pub fn http_client(timeout_secs: u64) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("anki-tts-backfill/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal(format!("HTTP client build failed: {}", e)))
}
