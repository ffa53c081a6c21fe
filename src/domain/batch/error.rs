use crate::error::AppError;
use crate::infrastructure::repositories::CardStoreError;

/// Failures that stop the whole run
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("connectivity check failed: {0}")]
    Connectivity(String),
    #[error("candidate query failed: {0}")]
    Query(String),
}

impl BatchError {
    pub(crate) fn query(err: CardStoreError) -> Self {
        BatchError::Query(err.to_string())
    }
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::Connectivity(msg) => AppError::Connectivity(msg),
            BatchError::Query(msg) => AppError::Query(msg),
        }
    }
}

/// Failures that skip one card and let the batch continue
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("speech synthesis failed for note {note_id}")]
    Synthesis { note_id: u64 },
    #[error("could not save {filename}: {source}")]
    Persistence {
        filename: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not update note {note_id}: {message}")]
    Update { note_id: u64, message: String },
}
