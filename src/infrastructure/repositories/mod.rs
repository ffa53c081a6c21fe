pub mod anki_connect_repository;
pub mod card_repository;
pub mod media_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod tts_repository;

pub use anki_connect_repository::AnkiConnectRepository;
pub use card_repository::{CardRepository, CardStoreError};
pub use media_repository::{FsMediaRepository, MediaRepository};
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use tts_repository::TtsRepository;
