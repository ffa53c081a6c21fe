use super::card_repository::{CardRepository, CardStoreError};
use crate::domain::card::Card;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;

/// AnkiConnect protocol version spoken by this client
const API_VERSION: u32 = 6;

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    action: &'a str,
    version: u32,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NoteField {
    value: String,
}

// notesInfo answers `{}` for ids that no longer exist, hence the defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteInfo {
    #[serde(default)]
    note_id: Option<u64>,
    #[serde(default)]
    fields: HashMap<String, NoteField>,
}

impl NoteInfo {
    fn into_card(self) -> Option<Card> {
        let note_id = self.note_id?;
        let fields = self
            .fields
            .into_iter()
            .map(|(name, field)| (name, field.value))
            .collect();
        Some(Card::new(note_id, fields))
    }
}

/// AnkiConnect implementation of the card repository
pub struct AnkiConnectRepository {
    client: Client,
    url: String,
}

impl AnkiConnectRepository {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }

    /// Send one action and return its `result`, which may legitimately be null
    async fn call<T: DeserializeOwned>(
        &self,
        action: &'static str,
        params: serde_json::Value,
    ) -> Result<Option<T>, CardStoreError> {
        tracing::debug!(action = action, url = %self.url, "Calling AnkiConnect");

        let request = ApiRequest {
            action,
            version: API_VERSION,
            params,
        };

        let response: ApiResponse<T> = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            tracing::warn!(action = action, error = %error, "AnkiConnect reported an error");
            return Err(CardStoreError::Service(error));
        }

        Ok(response.result)
    }

    async fn call_required<T: DeserializeOwned>(
        &self,
        action: &'static str,
        params: serde_json::Value,
    ) -> Result<T, CardStoreError> {
        self.call(action, params)
            .await?
            .ok_or(CardStoreError::MissingResult(action))
    }
}

#[async_trait]
impl CardRepository for AnkiConnectRepository {
    async fn version(&self) -> Result<u32, CardStoreError> {
        self.call_required("version", serde_json::json!({})).await
    }

    async fn find_notes(&self, query: &str) -> Result<Vec<u64>, CardStoreError> {
        let note_ids: Vec<u64> = self
            .call_required("findNotes", serde_json::json!({ "query": query }))
            .await?;
        tracing::debug!(query = query, note_count = note_ids.len(), "Notes found");
        Ok(note_ids)
    }

    async fn notes_info(&self, note_ids: &[u64]) -> Result<Vec<Card>, CardStoreError> {
        if note_ids.is_empty() {
            return Ok(Vec::new());
        }

        let notes: Vec<NoteInfo> = self
            .call_required("notesInfo", serde_json::json!({ "notes": note_ids }))
            .await?;

        Ok(notes.into_iter().filter_map(NoteInfo::into_card).collect())
    }

    async fn update_note_field(
        &self,
        note_id: u64,
        field: &str,
        value: &str,
    ) -> Result<(), CardStoreError> {
        let params = serde_json::json!({
            "note": {
                "id": note_id,
                "fields": { field: value }
            }
        });

        // Success is a null result with a null error
        self.call::<serde_json::Value>("updateNoteFields", params)
            .await
            .map(|_| ())
    }
}
