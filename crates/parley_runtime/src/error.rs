//! Runtime error types

use parley_core::ParleyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("A model call is already in progress for {0}")]
    CallInProgress(String),

    #[error("Model invocation failed: {0}")]
    InvocationFailed(String),

    #[error(transparent)]
    Core(#[from] ParleyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
