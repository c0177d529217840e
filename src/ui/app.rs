use eframe::egui;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::common::{ApiEvent, ChatParams};
use crate::network::{ApiClient, StreamClient};
use crate::storage::SessionStore;

use super::components::{alert, chat_area, input_bar, login_form, register_form, room_list};
use super::router::{self, Effect, Route};
use super::state::{
    AppState, LOGIN_FAILED, REGISTRATION_FAILED, ROOMS_FAILED, Screen,
};

const CHANNEL_CAPACITY: usize = 100;
const APP_TITLE: &str = "Room Chat";

/// What the user asked for during one frame.
enum UiAction {
    Navigate(Route),
    Login,
    Register,
    Logout,
    Submit,
}

pub struct ChatApp {
    state: AppState,
    store: SessionStore,
    api: ApiClient,
    server_url: String,
    runtime: Handle,
    api_sender: mpsc::Sender<ApiEvent>,
    api_receiver: mpsc::Receiver<ApiEvent>,
    title: Option<String>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        store: SessionStore,
        api: ApiClient,
        server_url: String,
        runtime: Handle,
        start: Route,
    ) -> Self {
        let (api_sender, api_receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let mut app = Self {
            state: AppState::new(Screen::Login(Default::default())),
            store,
            api,
            server_url,
            runtime,
            api_sender,
            api_receiver,
            title: None,
        };
        app.navigate(start);
        app
    }

    /// Full navigation: the current screen is dropped and the target is
    /// rebuilt behind the session gate.
    fn navigate(&mut self, route: Route) {
        if let Route::Chat(params) = &route {
            log::info!("Navigating to {}", params.to_query());
        }
        let token = self.store.token();
        let (screen, effect) = router::enter(route, token.as_deref(), &self.server_url);
        self.state.screen = screen;
        self.title = Some(match &self.state.screen {
            Screen::Chat(view) => view.session.title(),
            _ => APP_TITLE.to_string(),
        });

        match effect {
            Some(Effect::LoadRooms) => self.load_rooms(),
            Some(Effect::OpenStream(url)) => {
                let (command_sender, command_receiver) = mpsc::channel(CHANNEL_CAPACITY);
                let (event_sender, event_receiver) = mpsc::channel(CHANNEL_CAPACITY);
                if let Screen::Chat(view) = &mut self.state.screen {
                    view.attach(command_sender, event_receiver);
                }
                self.runtime.spawn(async move {
                    let client = StreamClient::new(url, event_sender, command_receiver);
                    if let Err(err) = client.run().await {
                        log::warn!("Stream task ended with error: {err}");
                    }
                });
            }
            None => {}
        }
    }

    fn load_rooms(&self) {
        let api = self.api.clone();
        let sender = self.api_sender.clone();
        self.runtime.spawn(async move {
            let event = match api.fetch_rooms().await {
                Ok(rooms) => {
                    log::info!("Loaded {} rooms", rooms.len());
                    ApiEvent::RoomsLoaded(rooms)
                }
                Err(err) => {
                    log::error!("Room fetch failed: {err}");
                    ApiEvent::RoomsFailed
                }
            };
            if let Err(err) = sender.send(event).await {
                log::warn!("Failed to deliver room listing to UI: {err}");
            }
        });
    }

    fn login(&mut self) {
        let Screen::Login(form) = &mut self.state.screen else {
            return;
        };
        form.pending = true;
        let (email, password) = (form.email.clone(), form.password.clone());
        let api = self.api.clone();
        let sender = self.api_sender.clone();
        self.runtime.spawn(async move {
            let event = login_outcome(&api, &email, &password).await;
            if let Err(err) = sender.send(event).await {
                log::warn!("Failed to deliver login result to UI: {err}");
            }
        });
    }

    fn register(&mut self) {
        let Screen::Register(form) = &mut self.state.screen else {
            return;
        };
        form.pending = true;
        let (username, email, password) = (
            form.username.clone(),
            form.email.clone(),
            form.password.clone(),
        );
        let api = self.api.clone();
        let sender = self.api_sender.clone();
        self.runtime.spawn(async move {
            let event = register_outcome(&api, &username, &email, &password).await;
            if let Err(err) = sender.send(event).await {
                log::warn!("Failed to deliver registration result to UI: {err}");
            }
        });
    }

    fn logout(&mut self) {
        if let Err(err) = self.store.clear() {
            log::error!("Failed to clear session token: {err}");
        }
        self.navigate(Route::Login);
    }

    fn handle_api_events(&mut self) {
        while let Ok(event) = self.api_receiver.try_recv() {
            match event {
                ApiEvent::Authenticated { token, alert } => match self.store.set(&token) {
                    Ok(()) => self.navigate(Route::Rooms),
                    Err(err) => {
                        log::error!("Failed to store session token: {err}");
                        self.finish_auth_attempt();
                        self.state.alert = Some(alert.to_string());
                    }
                },
                ApiEvent::AuthFailed { alert } => {
                    self.finish_auth_attempt();
                    self.state.alert = Some(alert.to_string());
                }
                ApiEvent::RoomsLoaded(rooms) => {
                    if let Screen::Rooms(directory) = &mut self.state.screen {
                        directory.rooms = rooms;
                        directory.loading = false;
                    }
                }
                ApiEvent::RoomsFailed => {
                    if let Screen::Rooms(directory) = &mut self.state.screen {
                        directory.loading = false;
                        self.state.alert = Some(ROOMS_FAILED.to_string());
                    }
                }
            }
        }
    }

    fn finish_auth_attempt(&mut self) {
        match &mut self.state.screen {
            Screen::Login(form) => form.pending = false,
            Screen::Register(form) => form.pending = false,
            _ => {}
        }
    }

    fn render_screen(&mut self, ui: &mut egui::Ui) -> Option<UiAction> {
        match &mut self.state.screen {
            Screen::Login(form) => {
                let actions = login_form::render(ui, form);
                if actions.go_register {
                    Some(UiAction::Navigate(Route::Register))
                } else if actions.submit {
                    Some(UiAction::Login)
                } else {
                    None
                }
            }
            Screen::Register(form) => {
                let actions = register_form::render(ui, form);
                if actions.go_login {
                    Some(UiAction::Navigate(Route::Login))
                } else if actions.submit {
                    Some(UiAction::Register)
                } else {
                    None
                }
            }
            Screen::Rooms(directory) => {
                let actions = room_list::render(ui, directory);
                if actions.logout {
                    Some(UiAction::Logout)
                } else {
                    actions
                        .open
                        .map(|params: ChatParams| UiAction::Navigate(Route::Chat(params)))
                }
            }
            Screen::Chat(view) => {
                let mut action = None;
                ui.horizontal(|ui| {
                    if ui.button("← Rooms").clicked() {
                        action = Some(UiAction::Navigate(Route::Rooms));
                    }
                    ui.heading(view.session.display_name());
                });
                ui.separator();
                chat_area::render(ui, view.session.log_mut());
                ui.separator();
                if input_bar::render(ui, &mut view.input) {
                    action = action.or(Some(UiAction::Submit));
                }
                action
            }
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Navigate(route) => self.navigate(route),
            UiAction::Login => self.login(),
            UiAction::Register => self.register(),
            UiAction::Logout => self.logout(),
            UiAction::Submit => {
                if let Screen::Chat(view) = &mut self.state.screen {
                    view.submit();
                }
            }
        }
    }
}

async fn login_outcome(api: &ApiClient, email: &str, password: &str) -> ApiEvent {
    match api.login(email, password).await {
        Ok(token) => ApiEvent::Authenticated {
            token,
            alert: LOGIN_FAILED,
        },
        Err(err) => {
            log::warn!("Login failed: {err}");
            ApiEvent::AuthFailed {
                alert: LOGIN_FAILED,
            }
        }
    }
}

async fn register_outcome(api: &ApiClient, username: &str, email: &str, password: &str) -> ApiEvent {
    match api.register(username, email, password).await {
        Ok(token) => ApiEvent::Authenticated {
            token,
            alert: REGISTRATION_FAILED,
        },
        Err(err) => {
            log::warn!("Registration failed: {err}");
            ApiEvent::AuthFailed {
                alert: REGISTRATION_FAILED,
            }
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_api_events();
        if let Screen::Chat(view) = &mut self.state.screen {
            view.handle_transport_events();
        }

        if let Some(title) = self.title.take() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
        }

        let action = egui::CentralPanel::default()
            .show(ctx, |ui| self.render_screen(ui))
            .inner;
        if let Some(action) = action {
            self.apply(action);
        }

        alert::render(ctx, &mut self.state.alert);

        ctx.request_repaint();
    }
}
