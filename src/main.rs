mod chat;
mod common;
mod config;
mod error;
mod network;
mod storage;
mod ui;

use std::error::Error;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tokio::runtime::Handle;

use common::ChatParams;
use config::{AppConfig, SERVER_URL_ENV};
use network::ApiClient;
use storage::SessionStore;
use ui::{ChatApp, Route};

#[derive(Parser)]
#[command(
    name = "room_chat",
    version,
    about = "Desktop client for a room-based chat server"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Chat server base URL (overrides config file and CHAT_SERVER_URL)
    #[arg(long, value_name = "URL")]
    server: Option<String>,
    /// Open a room directly, e.g. "room=1&name=general"
    #[arg(long, value_name = "QUERY")]
    open: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Forget the stored session token and exit
    Logout,
    /// Write the effective configuration to the config file and exit
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config)
        .with_overrides(std::env::var(SERVER_URL_ENV).ok(), cli.server.clone());

    if cli.command == Some(Command::InitConfig) {
        config::save_config(&cli.config, &app_config)?;
        log::info!("Wrote configuration to {}", cli.config);
        return Ok(());
    }

    storage::ensure_data_dir(&app_config.data_dir)?;
    let store = SessionStore::open(app_config.db_path())?;

    if cli.command == Some(Command::Logout) {
        store.clear()?;
        log::info!("Session token cleared");
        return Ok(());
    }

    let start = match cli.open.as_deref() {
        Some(query) => match ChatParams::from_query(query) {
            Some(params) => Route::Chat(params),
            None => {
                log::warn!("`--open {query}` names no room; showing the room directory");
                Route::Rooms
            }
        },
        None => Route::Rooms,
    };

    run_client(app_config, store, start)?;
    Ok(())
}

fn run_client(app_config: AppConfig, store: SessionStore, start: Route) -> Result<(), Box<dyn Error>> {
    let api = ApiClient::new(&app_config.server_url)?;
    let runtime = Handle::current();
    let options = eframe::NativeOptions::default();

    log::info!("Client started against {}", app_config.server_url);

    eframe::run_native(
        "Room Chat",
        options,
        Box::new(move |cc| {
            Ok(Box::new(ChatApp::new(
                cc,
                store,
                api,
                app_config.server_url,
                runtime,
                start,
            )))
        }),
    )?;
    Ok(())
}
