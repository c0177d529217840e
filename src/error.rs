use thiserror::Error;

use crate::common::CloseReason;

/// Errors surfaced by the client. Variants are coarse on purpose: the UI
/// only ever shows a generic alert, the detail goes to the log.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Login or registration answered with a non-success status.
    #[error("authentication failed (status {status})")]
    AuthFailure { status: u16 },

    /// Room listing failed: non-success status or transport error.
    #[error("room directory fetch failed: {0}")]
    DirectoryFetch(String),

    /// The configured server cannot carry a WebSocket stream.
    #[error("stream unavailable: {0}")]
    StreamUnavailable(String),

    #[error("stream closed: {0}")]
    StreamClosed(CloseReason),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
