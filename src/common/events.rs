use std::fmt;

use crate::common::types::Room;

/// Events from the stream transport to the chat view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    /// Raw text payload of one frame; may hold several `\n`-joined envelopes.
    Frame(String),
    Closed(CloseReason),
}

/// Why a stream ended. Only logged; the user sees one notice for all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// Server sent a close frame.
    Remote { code: u16, reason: String },
    /// Stream ended without a close frame.
    Eof,
    /// Connecting or reading failed.
    Error(String),
    /// The view went away and dropped its command channel.
    Local,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::Remote { code, reason } if reason.is_empty() => {
                write!(f, "closed by server (code {code})")
            }
            CloseReason::Remote { code, reason } => {
                write!(f, "closed by server (code {code}): {reason}")
            }
            CloseReason::Eof => write!(f, "stream ended"),
            CloseReason::Error(err) => write!(f, "transport error: {err}"),
            CloseReason::Local => write!(f, "closed locally"),
        }
    }
}

/// Results of one-shot REST calls, delivered back to the UI.
#[derive(Debug, Clone)]
pub enum ApiEvent {
    /// `alert` is shown if the token cannot be stored.
    Authenticated { token: String, alert: &'static str },
    AuthFailed { alert: &'static str },
    RoomsLoaded(Vec<Room>),
    RoomsFailed,
}
