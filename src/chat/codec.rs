//! Stream payload encoding and rendering.

use chrono::{DateTime, Local};

use crate::common::types::{IncomingEnvelope, OutgoingMessage};
use crate::error::ClientResult;

const TIME_FORMAT: &str = "%H:%M:%S";

pub fn encode(message: &OutgoingMessage) -> ClientResult<String> {
    Ok(serde_json::to_string(message)?)
}

/// Splits a frame on `\n` and decodes each non-blank line on its own,
/// keeping the order of the payload. One bad line does not poison the rest.
pub fn decode_frame(frame: &str) -> Vec<serde_json::Result<IncomingEnvelope>> {
    frame
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line))
        .collect()
}

/// `<time> <author>: <body>`, one entry per line of the body.
pub fn render_envelope(envelope: &IncomingEnvelope) -> Vec<String> {
    let data = &envelope.data;
    let message = format!(
        "{} {}: {}",
        display_time(&data.sent_at),
        data.author(),
        data.body
    );
    message.split('\n').map(str::to_string).collect()
}

/// RFC 3339 timestamp in local wall-clock time; unparseable input is kept as is.
pub fn display_time(sent_at: &str) -> String {
    match DateTime::parse_from_rfc3339(sent_at) {
        Ok(time) => time.with_timezone(&Local).format(TIME_FORMAT).to_string(),
        Err(err) => {
            log::debug!("Unparseable sent_at `{sent_at}`: {err}");
            sent_at.to_string()
        }
    }
}
