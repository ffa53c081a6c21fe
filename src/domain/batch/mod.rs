pub mod error;
pub mod service;

pub use error::{BatchError, ItemError};
pub use service::{BatchService, BatchServiceApi};

use crate::domain::audio::{NamingConfig, VoiceConfig};
use crate::domain::card::FieldNames;

/// Settings for one batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub fields: FieldNames,
    pub naming: NamingConfig,
    pub voice: VoiceConfig,
    /// Restrict selection to one deck, `None` for all decks
    pub deck_name: Option<String>,
    /// Process only the first candidate
    pub single_item: bool,
    /// Explain empty selections by inspecting what is in scope
    pub diagnostics: bool,
}

/// What happened to one candidate
#[derive(Debug)]
pub enum ItemOutcome {
    Processed { filename: String },
    Failed(ItemError),
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub errored: usize,
    /// Candidates selected, before the single-item limit
    pub total: usize,
    /// Candidates actually iterated
    pub attempted: usize,
    pub single_item: bool,
}

impl BatchReport {
    fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Processed { .. } => self.processed += 1,
            ItemOutcome::Failed(_) => self.errored += 1,
        }
    }
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Processed: {}/{}, Errors: {}",
            self.processed, self.attempted, self.errored
        )?;
        if self.single_item {
            write!(f, " (test mode, {} cards need audio in total)", self.total)?;
        }
        Ok(())
    }
}
