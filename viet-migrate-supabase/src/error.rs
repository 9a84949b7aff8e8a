/// Errors that can occur talking to the hosted store.
#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Supabase error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Row not found: {table} with id {id}")]
    NotFound { table: String, id: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
