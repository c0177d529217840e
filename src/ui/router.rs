use url::Url;

use crate::chat::{ChatSession, SessionState};
use crate::common::ChatParams;

use super::state::{ChatView, LoginForm, RegisterForm, RoomDirectory, Screen};

/// Navigation targets, the desktop counterpart of the client's pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Rooms,
    Chat(ChatParams),
}

impl Route {
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Rooms | Route::Chat(_))
    }
}

/// Network work a freshly entered screen needs started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadRooms,
    OpenStream(Url),
}

/// Builds the screen for `route`. Protected routes without a token land on
/// the login screen with no effect, so nothing touches the network.
pub fn enter(route: Route, token: Option<&str>, server_url: &str) -> (Screen, Option<Effect>) {
    if route.is_protected() && token.is_none() {
        log::info!("No session token; redirecting {route:?} to login");
        return (Screen::Login(LoginForm::default()), None);
    }

    match route {
        Route::Login => (Screen::Login(LoginForm::default()), None),
        Route::Register => (Screen::Register(RegisterForm::default()), None),
        Route::Rooms => (
            Screen::Rooms(RoomDirectory {
                rooms: Vec::new(),
                loading: true,
            }),
            Some(Effect::LoadRooms),
        ),
        Route::Chat(params) => {
            let mut session = ChatSession::start(params, token, server_url);
            if session.state() == SessionState::Unauthenticated {
                return (Screen::Login(LoginForm::default()), None);
            }
            let effect = session.take_endpoint().map(Effect::OpenStream);
            (Screen::Chat(ChatView::new(session)), effect)
        }
    }
}
