use std::collections::HashMap;

/// Transient copy of an Anki note's fields
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub note_id: u64,
    /// Field name to raw value. Values may contain HTML.
    pub fields: HashMap<String, String>,
}

impl Card {
    pub fn new(note_id: u64, fields: HashMap<String, String>) -> Self {
        Self { note_id, fields }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Field names sorted for stable log output
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fields.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Which note fields hold the text to speak and the audio reference
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNames {
    pub source: String,
    pub audio: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            source: "Swedish Example".to_string(),
            audio: "Swedish sentence audio".to_string(),
        }
    }
}

/// A card that needs audio in this run
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub note_id: u64,
    /// Trimmed raw source field, markup still included
    pub source_text: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("note {note_id} has no field '{field}'")]
pub struct MissingFieldError {
    pub note_id: u64,
    pub field: String,
    pub available: Vec<String>,
}

impl Candidate {
    /// Decide whether a card needs audio.
    ///
    /// Returns `Ok(None)` when the source text is empty or the audio field is
    /// already filled, and an error when the note type lacks either field.
    pub fn from_card(card: &Card, fields: &FieldNames) -> Result<Option<Self>, MissingFieldError> {
        let lookup = |name: &str| {
            card.field(name).ok_or_else(|| MissingFieldError {
                note_id: card.note_id,
                field: name.to_string(),
                available: card.field_names(),
            })
        };

        let source_text = lookup(fields.source.as_str())?.trim();
        let audio = lookup(fields.audio.as_str())?.trim();

        if source_text.is_empty() || !audio.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self {
            note_id: card.note_id,
            source_text: source_text.to_string(),
        }))
    }
}

/// Result of filtering fetched cards
#[derive(Debug, Default)]
pub struct Selection {
    pub candidates: Vec<Candidate>,
    /// Cards whose note type lacks one of the configured fields
    pub malformed: Vec<MissingFieldError>,
}

/// Keep cards with source text and no audio, in the order they were fetched
pub fn select_candidates(cards: &[Card], fields: &FieldNames) -> Selection {
    let mut selection = Selection::default();

    for card in cards {
        match Candidate::from_card(card, fields) {
            Ok(Some(candidate)) => selection.candidates.push(candidate),
            Ok(None) => {}
            Err(e) => selection.malformed.push(e),
        }
    }

    selection
}
