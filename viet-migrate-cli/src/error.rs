use thiserror::Error;
use viet_migrate_import::SourceError;
use viet_migrate_supabase::SupabaseError;

/// Errors that end the run with a non-zero exit status.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Missing or invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Unreadable or corrupt source document
    #[error("{0}")]
    Source(#[from] SourceError),

    /// Destination could not be opened
    #[error("Database error: {0}")]
    Database(String),
}

impl From<SupabaseError> for CliError {
    fn from(e: SupabaseError) -> Self {
        match e {
            SupabaseError::Config(msg) => Self::Config(msg),
            other => Self::Database(other.to_string()),
        }
    }
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}
