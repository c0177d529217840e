pub mod commands;
pub mod events;
pub mod types;

pub use commands::StreamCommand;
pub use events::{ApiEvent, CloseReason, TransportEvent};
pub use types::{ChatParams, OutgoingMessage, Room};
