use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("manifest unreadable: {0}")]
    ManifestUnreadable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GateError>;
