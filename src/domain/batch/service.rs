use super::error::{BatchError, ItemError};
use super::{BatchOptions, BatchReport, ItemOutcome};
use crate::domain::audio::{audio_tag, AudioArtifact};
use crate::domain::card::{build_scope_query, build_search_query, select_candidates, Candidate};
use crate::domain::text::strip_markup;
use crate::infrastructure::repositories::{CardRepository, MediaRepository, TtsRepository};
use async_trait::async_trait;
use std::sync::Arc;

/// Characters of card text shown in progress logs
const PREVIEW_CHARS: usize = 50;

pub struct BatchService {
    card_repo: Arc<dyn CardRepository>,
    tts_repo: Arc<dyn TtsRepository>,
    media_repo: Arc<dyn MediaRepository>,
    options: BatchOptions,
}

impl BatchService {
    pub fn new(
        card_repo: Arc<dyn CardRepository>,
        tts_repo: Arc<dyn TtsRepository>,
        media_repo: Arc<dyn MediaRepository>,
        options: BatchOptions,
    ) -> Self {
        Self {
            card_repo,
            tts_repo,
            media_repo,
            options,
        }
    }
}

#[async_trait]
pub trait BatchServiceApi: Send + Sync {
    /// Generate audio for every card that is missing it
    ///
    /// This operation:
    /// - Checks that the card store is reachable
    /// - Selects notes with source text and an empty audio field
    /// - Synthesizes, saves and links audio one card at a time
    ///
    /// Per-card failures are counted in the report. Only an unreachable
    /// card store or a failed selection query return an error.
    async fn run(&self) -> Result<BatchReport, BatchError>;
}

#[async_trait]
impl BatchServiceApi for BatchService {
    async fn run(&self) -> Result<BatchReport, BatchError> {
        // 1. Probe
        let version = self
            .card_repo
            .version()
            .await
            .map_err(|e| BatchError::Connectivity(e.to_string()))?;
        tracing::info!(version = version, "Connected to AnkiConnect");

        // 2. Select
        let mut candidates = self.select().await?;
        let total = candidates.len();

        if total == 0 {
            tracing::info!(
                deck = self.deck_label(),
                "No cards found that need audio generation"
            );
            return Ok(BatchReport {
                single_item: self.options.single_item,
                ..BatchReport::default()
            });
        }

        // 3. Limit
        if self.options.single_item {
            candidates.truncate(1);
            tracing::info!(total = total, "Test mode: processing only the first card");
        } else {
            tracing::info!(total = total, "Cards needing audio generation");
        }

        // 4. Iterate
        let mut report = BatchReport {
            total,
            attempted: candidates.len(),
            single_item: self.options.single_item,
            ..BatchReport::default()
        };

        for (index, candidate) in candidates.iter().enumerate() {
            tracing::info!(
                note_id = candidate.note_id,
                text = %preview(&candidate.source_text),
                "Processing card {}/{}",
                index + 1,
                report.attempted
            );

            let outcome = self.process_candidate(candidate).await;
            match &outcome {
                ItemOutcome::Processed { filename } => tracing::info!(
                    note_id = candidate.note_id,
                    filename = %filename,
                    "Card updated with audio"
                ),
                ItemOutcome::Failed(e) => tracing::warn!(
                    note_id = candidate.note_id,
                    error = %e,
                    "Card skipped"
                ),
            }
            report.record(&outcome);
        }

        // 5. Report
        tracing::info!(
            processed = report.processed,
            errored = report.errored,
            attempted = report.attempted,
            total = report.total,
            "Batch completed"
        );

        Ok(report)
    }
}

impl BatchService {
    fn deck_label(&self) -> &str {
        self.options.deck_name.as_deref().unwrap_or("all decks")
    }

    /// Query the store and keep the cards that still need audio
    async fn select(&self) -> Result<Vec<Candidate>, BatchError> {
        let query = build_search_query(&self.options.fields, self.options.deck_name.as_deref());
        tracing::debug!(query = %query, "Searching for notes");

        let note_ids = self
            .card_repo
            .find_notes(&query)
            .await
            .map_err(BatchError::query)?;

        if note_ids.is_empty() {
            if self.options.diagnostics {
                self.diagnose_empty_selection().await;
            }
            return Ok(Vec::new());
        }

        tracing::info!(
            deck = self.deck_label(),
            note_count = note_ids.len(),
            "Notes that might need audio"
        );

        let cards = self
            .card_repo
            .notes_info(&note_ids)
            .await
            .map_err(BatchError::query)?;

        let selection = select_candidates(&cards, &self.options.fields);
        for missing in &selection.malformed {
            tracing::debug!(
                note_id = missing.note_id,
                field = %missing.field,
                available = ?missing.available,
                "Skipping note without expected field"
            );
        }

        Ok(selection.candidates)
    }

    /// Log what is in scope so misconfigured field names are easy to spot
    async fn diagnose_empty_selection(&self) {
        let query = build_scope_query(self.options.deck_name.as_deref());
        tracing::debug!(query = %query, "Trying broader search");

        let note_ids = match self.card_repo.find_notes(&query).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::debug!(error = %e, "Broader search failed");
                return;
            }
        };
        tracing::debug!(note_count = note_ids.len(), "Total notes in scope");

        let Some(first) = note_ids.first() else {
            return;
        };

        match self.card_repo.notes_info(&[*first]).await {
            Ok(cards) => {
                if let Some(card) = cards.first() {
                    tracing::debug!(
                        note_id = card.note_id,
                        fields = ?card.field_names(),
                        expected_source = %self.options.fields.source,
                        expected_audio = %self.options.fields.audio,
                        "Available fields in first note"
                    );
                }
            }
            Err(e) => tracing::debug!(error = %e, "Could not fetch sample note"),
        }
    }

    /// Synthesize, save and link audio for one card
    async fn process_candidate(&self, candidate: &Candidate) -> ItemOutcome {
        let clean_text = strip_markup(&candidate.source_text);

        let Some(audio) = self.synthesize_audio(&clean_text).await else {
            return ItemOutcome::Failed(ItemError::Synthesis {
                note_id: candidate.note_id,
            });
        };

        // Named after the raw text so reruns produce the same file
        let artifact = AudioArtifact::new(
            &candidate.source_text,
            audio,
            self.options.voice.format,
            &self.options.naming,
        );

        if let Err(source) = self.media_repo.persist(&artifact).await {
            return ItemOutcome::Failed(ItemError::Persistence {
                filename: artifact.filename,
                source,
            });
        }

        let tag = audio_tag(&artifact.filename);
        match self
            .card_repo
            .update_note_field(candidate.note_id, &self.options.fields.audio, &tag)
            .await
        {
            Ok(()) => ItemOutcome::Processed {
                filename: artifact.filename,
            },
            Err(e) => ItemOutcome::Failed(ItemError::Update {
                note_id: candidate.note_id,
                message: e.to_string(),
            }),
        }
    }

    /// Provider errors and empty payloads both become `None`
    async fn synthesize_audio(&self, text: &str) -> Option<Vec<u8>> {
        if text.is_empty() {
            tracing::warn!("Nothing left to speak after removing markup");
            return None;
        }

        tracing::debug!(text = %text, "Cleaned text for TTS");

        match self.tts_repo.synthesize(text, &self.options.voice).await {
            Ok(audio) if audio.is_empty() => {
                tracing::error!(text = %text, "TTS provider returned no audio");
                None
            }
            Ok(audio) => Some(audio),
            Err(e) => {
                tracing::error!(text = %text, error = %e, "Error generating audio");
                None
            }
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
