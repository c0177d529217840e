use url::Url;

use crate::common::types::capitalize;
use crate::common::{ChatParams, OutgoingMessage, TransportEvent};
use crate::network::transport::stream_url;

use super::codec;
use super::scrollback::ChatLog;

pub const NOTICE_CLOSED: &str = "Connection closed.";
pub const NOTICE_UNSUPPORTED: &str = "Your client does not support WebSockets.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token; the view redirects to login.
    Unauthenticated,
    Connecting,
    Open,
    Closed,
    /// The server address cannot carry a stream.
    Unsupported,
}

/// Client side of one room stream: lifecycle, input gate and log.
///
/// Pure state machine; the owning view feeds it [`TransportEvent`]s and
/// forwards whatever [`ChatSession::submit`] returns to the transport.
pub struct ChatSession {
    params: ChatParams,
    state: SessionState,
    log: ChatLog,
    endpoint: Option<Url>,
}

impl ChatSession {
    pub fn start(params: ChatParams, token: Option<&str>, server_url: &str) -> Self {
        let mut session = Self {
            params,
            state: SessionState::Unauthenticated,
            log: ChatLog::new(),
            endpoint: None,
        };

        let Some(token) = token else {
            log::info!("No session token; chat view redirects to login");
            return session;
        };

        match stream_url(server_url, &session.params.room, token) {
            Ok(url) => {
                session.state = SessionState::Connecting;
                session.endpoint = Some(url);
            }
            Err(err) => {
                log::warn!("No stream for server {server_url}: {err}");
                session.state = SessionState::Unsupported;
                session.log.push_notice(NOTICE_UNSUPPORTED);
            }
        }
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// `Room: <Name>`
    pub fn title(&self) -> String {
        format!("Room: {}", self.display_name())
    }

    pub fn display_name(&self) -> String {
        capitalize(&self.params.name)
    }

    #[cfg(test)]
    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ChatLog {
        &mut self.log
    }

    /// Stream address to dial; handed out once.
    pub fn take_endpoint(&mut self) -> Option<Url> {
        self.endpoint.take()
    }

    /// Turns the input into one send envelope and clears it, or leaves the
    /// input untouched when the session is not open or the text is blank.
    pub fn submit(&mut self, input: &mut String) -> Option<OutgoingMessage> {
        if self.state != SessionState::Open {
            return None;
        }
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        let message = OutgoingMessage::Send {
            text: text.to_string(),
        };
        input.clear();
        Some(message)
    }

    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => {
                if self.state == SessionState::Connecting {
                    self.state = SessionState::Open;
                }
            }
            TransportEvent::Frame(frame) => {
                if self.state == SessionState::Open {
                    self.render_frame(&frame);
                } else {
                    log::debug!("Ignoring frame in state {:?}", self.state);
                }
            }
            TransportEvent::Closed(reason) => {
                if matches!(self.state, SessionState::Connecting | SessionState::Open) {
                    log::info!("Room {} stream ended: {reason}", self.params.room);
                    self.state = SessionState::Closed;
                    self.log.push_notice(NOTICE_CLOSED);
                }
            }
        }
    }

    fn render_frame(&mut self, frame: &str) {
        for decoded in codec::decode_frame(frame) {
            match decoded {
                Ok(envelope) => {
                    log::trace!("Envelope {:?} from {}", envelope.kind, envelope.data.author());
                    for line in codec::render_envelope(&envelope) {
                        self.log.push_line(line);
                    }
                }
                Err(err) => log::warn!("Skipping undecodable envelope: {err}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CloseReason;

    const SERVER: &str = "http://localhost:8080";

    fn open_session() -> ChatSession {
        let mut session = ChatSession::start(ChatParams::new("1", "general"), Some("tok"), SERVER);
        session.handle_event(TransportEvent::Opened);
        assert_eq!(session.state(), SessionState::Open);
        session
    }

    fn texts(session: &ChatSession) -> Vec<&str> {
        session.log().lines().iter().map(|line| line.text.as_str()).collect()
    }

    fn envelope(username: &str, body: &str) -> String {
        serde_json::json!({
            "data": { "sent_at": "2024-01-01T10:00:00Z", "username": username, "body": body }
        })
        .to_string()
    }

    #[test]
    fn missing_token_never_connects() {
        let mut session = ChatSession::start(ChatParams::new("1", "general"), None, SERVER);
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(session.take_endpoint(), None);
        assert!(session.log().is_empty());
    }

    #[test]
    fn endpoint_carries_room_and_token_once() {
        let mut session = ChatSession::start(ChatParams::new("1", "general"), Some("tok"), SERVER);
        assert_eq!(session.state(), SessionState::Connecting);
        assert_eq!(session.title(), "Room: General");
        assert_eq!(
            session.take_endpoint().unwrap().as_str(),
            "ws://localhost:8080/ws/1?token=tok"
        );
        assert_eq!(session.take_endpoint(), None);
    }

    #[test]
    fn unsupported_server_adds_notice_and_stays_put() {
        let mut session =
            ChatSession::start(ChatParams::new("1", "general"), Some("tok"), "file:///tmp/chat");
        assert_eq!(session.state(), SessionState::Unsupported);
        assert_eq!(session.take_endpoint(), None);
        assert_eq!(texts(&session), vec![NOTICE_UNSUPPORTED]);

        session.handle_event(TransportEvent::Closed(CloseReason::Eof));
        assert_eq!(texts(&session), vec![NOTICE_UNSUPPORTED]);
    }

    #[test]
    fn submit_sends_trimmed_text_and_clears_input() {
        let mut session = open_session();
        let mut input = "  hello there \n".to_string();
        assert_eq!(
            session.submit(&mut input),
            Some(OutgoingMessage::Send {
                text: "hello there".to_string()
            })
        );
        assert!(input.is_empty());
    }

    #[test]
    fn blank_submit_is_a_no_op() {
        let mut session = open_session();
        for blank in ["", "  ", "\t\n"] {
            let mut input = blank.to_string();
            assert_eq!(session.submit(&mut input), None);
            assert_eq!(input, blank);
        }
    }

    #[test]
    fn submit_before_open_is_a_no_op() {
        let mut session = ChatSession::start(ChatParams::new("1", "general"), Some("tok"), SERVER);
        let mut input = "early".to_string();
        assert_eq!(session.submit(&mut input), None);
        assert_eq!(input, "early");
    }

    #[test]
    fn frame_envelopes_render_in_arrival_order() {
        let mut session = open_session();
        let frame = [envelope("amy", "hi\nthere"), envelope("bob", "yo")].join("\n");
        session.handle_event(TransportEvent::Frame(frame));
        session.handle_event(TransportEvent::Frame(envelope("cat", "last")));

        let lines = texts(&session);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("amy: hi"));
        assert_eq!(lines[1], "there");
        assert!(lines[2].ends_with("bob: yo"));
        assert!(lines[3].ends_with("cat: last"));
    }

    #[test]
    fn bad_envelope_does_not_drop_neighbours() {
        let mut session = open_session();
        let frame = format!("{}\n{{broken\n{}", envelope("amy", "a"), envelope("bob", "b"));
        session.handle_event(TransportEvent::Frame(frame));
        assert_eq!(session.log().len(), 2);
    }

    #[test]
    fn close_appends_one_notice_and_blocks_submit() {
        let mut session = open_session();
        session.handle_event(TransportEvent::Closed(CloseReason::Remote {
            code: 1000,
            reason: String::new(),
        }));
        session.handle_event(TransportEvent::Closed(CloseReason::Local));
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(texts(&session), vec![NOTICE_CLOSED]);
        assert!(session.log().lines()[0].notice);

        let mut input = "anyone?".to_string();
        assert_eq!(session.submit(&mut input), None);
        assert_eq!(input, "anyone?");

        session.handle_event(TransportEvent::Frame(envelope("amy", "late")));
        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn failed_connect_closes_without_opening() {
        let mut session = ChatSession::start(ChatParams::new("1", "general"), Some("tok"), SERVER);
        session.handle_event(TransportEvent::Closed(CloseReason::Error("refused".into())));
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(texts(&session), vec![NOTICE_CLOSED]);
    }
}
