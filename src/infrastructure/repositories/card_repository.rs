use crate::domain::card::Card;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum CardStoreError {
    #[error("AnkiConnect request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("AnkiConnect error: {0}")]
    Service(String),
    #[error("AnkiConnect returned no result for '{0}'")]
    MissingResult(&'static str),
}

/// Repository for the card database the audio is written back to.
/// Abstracts the transport (AnkiConnect over HTTP in production).
///
/// Every call is a single round trip. Failures are returned to the caller,
/// which decides whether they abort the run or only skip one card.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Connectivity probe, returns the API version
    async fn version(&self) -> Result<u32, CardStoreError>;

    /// Note ids matching an Anki search query
    async fn find_notes(&self, query: &str) -> Result<Vec<u64>, CardStoreError>;

    /// Field values for the given notes, in request order
    async fn notes_info(&self, note_ids: &[u64]) -> Result<Vec<Card>, CardStoreError>;

    /// Overwrite a single field of a note
    async fn update_note_field(
        &self,
        note_id: u64,
        field: &str,
        value: &str,
    ) -> Result<(), CardStoreError>;
}
