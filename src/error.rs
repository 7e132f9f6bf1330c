//! Error types for the page platform layer.
//!
//! Controllers never surface these to the user: a failed storage write or a
//! missing cookie jar is logged and the page carries on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("local storage is not available in this context")]
    StorageUnavailable,

    #[error("storage operation failed: {0}")]
    Storage(String),

    #[error("cookie operation failed: {0}")]
    Cookie(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timer could not be scheduled: {0}")]
    Timer(String),

    #[error("invalid page config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type UiResult<T> = Result<T, UiError>;
