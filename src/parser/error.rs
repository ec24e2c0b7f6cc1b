#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to index source locations at position {position}: {message}")]
    Location { position: usize, message: String },
}
