use tokio::sync::mpsc;

use crate::chat::ChatSession;
use crate::common::{Room, StreamCommand, TransportEvent};

pub const LOGIN_FAILED: &str = "login failed";
pub const REGISTRATION_FAILED: &str = "registration failed";
pub const ROOMS_FAILED: &str = "Could not load rooms. Please try again later.";

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub pending: bool,
}

#[derive(Debug, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub pending: bool,
}

#[derive(Debug, Default)]
pub struct RoomDirectory {
    pub rooms: Vec<Room>,
    pub loading: bool,
}

/// The chat view: session state plus the channels of its stream task.
/// Dropping it drops the command sender, which closes the stream.
pub struct ChatView {
    pub session: ChatSession,
    pub input: String,
    command_sender: Option<mpsc::Sender<StreamCommand>>,
    event_receiver: Option<mpsc::Receiver<TransportEvent>>,
}

impl ChatView {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session,
            input: String::new(),
            command_sender: None,
            event_receiver: None,
        }
    }

    pub fn attach(
        &mut self,
        command_sender: mpsc::Sender<StreamCommand>,
        event_receiver: mpsc::Receiver<TransportEvent>,
    ) {
        self.command_sender = Some(command_sender);
        self.event_receiver = Some(event_receiver);
    }

    pub fn handle_transport_events(&mut self) {
        let Some(receiver) = self.event_receiver.as_mut() else {
            return;
        };
        while let Ok(event) = receiver.try_recv() {
            self.session.handle_event(event);
        }
    }

    /// Hands the input to the stream task. The input is only cleared once
    /// the task has accepted the envelope.
    pub fn submit(&mut self) {
        let typed = self.input.clone();
        let Some(message) = self.session.submit(&mut self.input) else {
            return;
        };
        let result = match &self.command_sender {
            Some(sender) => sender
                .try_send(StreamCommand::Send(message))
                .map_err(|err| err.to_string()),
            None => Err("no stream task".to_string()),
        };
        if let Err(err) = result {
            log::warn!("Failed to hand message to stream, keeping input: {err}");
            self.input = typed;
        }
    }
}

/// What is on screen. Replacing it is a full navigation.
pub enum Screen {
    Login(LoginForm),
    Register(RegisterForm),
    Rooms(RoomDirectory),
    Chat(ChatView),
}

pub struct AppState {
    pub screen: Screen,
    pub alert: Option<String>,
}

impl AppState {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            alert: None,
        }
    }
}
