use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParleyError {
    #[error("group chat on '{platform}' has no group id")]
    MissingChatId { platform: String },

    #[error("invalid conversation key: {0}")]
    InvalidKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ParleyError>;
