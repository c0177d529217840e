use crate::common::types::OutgoingMessage;

/// Commands from the chat view down to the stream transport.
#[derive(Debug, Clone)]
pub enum StreamCommand {
    Send(OutgoingMessage),
}
