use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qoltyrau::{
    api,
    bot::telegram,
    config::BotConfig,
    state::{spawn_session_sweeper, AppState},
    text::Messages,
    types::GameConfig,
    words::WordBank,
};

/// How often the idle-session sweeper runs
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qoltyrau=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting qoltyrau...");

    let bot_config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let game_config = match GameConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // An empty or unreadable word list is fatal before any session exists
    let words = match WordBank::load(&bot_config.words_file) {
        Ok(words) => words,
        Err(e) => {
            tracing::error!("Failed to load word list: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(
        game_config,
        Arc::new(words),
        Messages::new(bot_config.locale),
    ));

    if let Some(ttl) = bot_config.session_idle_ttl {
        spawn_session_sweeper(state.sessions.clone(), ttl, SWEEP_INTERVAL);
    }

    if let Some(addr) = bot_config.status_addr {
        spawn_status_server(addr, state.clone());
    }

    let bot = teloxide::Bot::new(&bot_config.token);
    if let Err(e) = telegram::run(bot, state, bot_config.invite_url).await {
        tracing::error!("Telegram bot stopped: {}", e);
        std::process::exit(1);
    }
}

fn spawn_status_server(addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!("Failed to bind status server on {}: {}", addr, e);
                return;
            }
        };
        tracing::info!("Status API listening on http://{}", addr);

        if let Err(e) = axum::serve(listener, api::router(state)).await {
            tracing::error!("Status server failed: {}", e);
        }
    });
}
