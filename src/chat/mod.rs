pub mod codec;
pub mod scrollback;
pub mod session;

pub use scrollback::ChatLog;
pub use session::{ChatSession, SessionState};
