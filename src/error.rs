/// Main application error type.
///
/// Every variant is fatal for a run. Problems with a single card never
/// become an `AppError`; they are counted in the batch report instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot reach AnkiConnect: {0}")]
    Connectivity(String),

    #[error("Card query failed: {0}")]
    Query(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Connectivity(_) | Self::Query(_) | Self::Internal(_) => 1,
        }
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
