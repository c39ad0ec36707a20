use std::sync::Arc;
use anyhow::{bail, Result};
use chatline_core::{ChatClient, Config, HttpBackend};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

mod app;
mod console;
mod handler;
mod logging;
mod tui;
mod ui;
mod view;

use app::App;
use console::ConsoleView;
use tui::EventHandler;
use view::TuiView;

#[derive(Parser)]
#[command(name = "chatline", version)]
#[command(about = "Terminal client for the chat backend")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "CHATLINE_URL", global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message and print the reply
    Send {
        /// Message text
        message: String,
    },
    /// Print recent conversation history
    History {
        /// Maximum number of exchanges
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print backend health status
    Health,
    /// Show the saved settings, or update them
    Config {
        /// Backend base URL to save
        #[arg(long)]
        base_url: Option<String>,
        /// Seconds between health checks
        #[arg(long)]
        poll_interval: Option<u64>,
        /// Exchanges fetched by the history command and the `h` key
        #[arg(long)]
        history_limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Logging disabled: {e:#}");
    }

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Could not read config, using defaults: {e:#}");
        Config::new()
    });

    if let Some(Commands::Config { base_url, poll_interval, history_limit }) = cli.command {
        let updates = Config {
            base_url,
            poll_interval_secs: poll_interval,
            history_limit,
        };
        return configure(config, updates);
    }

    let base_url = cli.url.as_deref().unwrap_or(config.base_url());
    let backend = Arc::new(HttpBackend::new(base_url)?);
    info!(base_url = %backend.base_url(), "starting chatline");

    match cli.command {
        None => run_tui(backend, &config).await,
        Some(Commands::Send { message }) => {
            let mut client = ChatClient::new(backend, ConsoleView::new());
            if !client.submit(&message).await {
                bail!("Message cannot be empty");
            }
            if client.view().saw_error {
                bail!("No reply from the chat backend");
            }
            Ok(())
        }
        Some(Commands::History { limit }) => {
            let mut client = ChatClient::new(backend, ConsoleView::new());
            client
                .load_history(limit.unwrap_or_else(|| config.history_limit()))
                .await;
            Ok(())
        }
        Some(Commands::Health) => {
            let mut client = ChatClient::new(backend, ConsoleView::new());
            client.poll_health().await;
            Ok(())
        }
        Some(Commands::Config { .. }) => Ok(()),
    }
}

fn configure(mut config: Config, updates: Config) -> Result<()> {
    if let Some(url) = &updates.base_url {
        HttpBackend::new(url)?;
    }

    if config.merge(updates) {
        config.save()?;
        let path = Config::get_config_path()?;
        info!("Saved config to {}", path.display());
        println!("Saved {}", path.display());
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

async fn run_tui(backend: Arc<HttpBackend>, config: &Config) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut events = EventHandler::new(config.poll_interval());
    let client = ChatClient::new(backend, TuiView::new());
    let mut app = App::new(client, events.sender(), config.history_limit());

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut tui::Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}
