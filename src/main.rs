use anyhow::Result;
use clap::Parser;

mod app;
mod client;
mod config;
mod handler;
mod logging;
mod state;
#[cfg(test)]
mod test_support;
mod tui;
mod ui;

use app::App;
use client::ChatClient;
use config::Config;
use state::AGENT_AUTHOR;
use tui::{AppEvent, EventHandler, Tui};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Parser)]
#[command(name = "tarara")]
#[command(about = "Terminal chat with the Tarara assistant")]
struct Cli {
    /// Send this message once and print the reply instead of opening the chat
    message: Vec<String>,

    /// Base URL of the chat server
    #[arg(short, long)]
    server: Option<String>,

    /// Log filter, e.g. "debug" or "tarara=debug,reqwest=warn"
    #[arg(long)]
    log_level: Option<String>,

    /// Remember --server and --log-level in the config file
    #[arg(long)]
    save: bool,
}

impl Cli {
    fn apply_to(&self, config: &mut Config) {
        if let Some(server) = &self.server {
            config.server_url = Some(server.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = Some(level.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    cli.apply_to(&mut config);
    if cli.save {
        config.save()?;
    }

    let log_dir = logging::default_log_dir();
    if let Err(e) = log_dir.and_then(|dir| logging::init_logging(config.log_level(), &dir)) {
        eprintln!("Logging disabled: {}", e);
    }

    let client = ChatClient::new(config.server_url(), config.request_timeout())?;
    tracing::info!(endpoint = %client.endpoint(), "starting");

    if cli.message.is_empty() {
        run_tui(client).await
    } else {
        run_once(&client, &cli.message.join(" ")).await
    }
}

/// One-shot mode: send a single message and print what comes back.
async fn run_once(client: &ChatClient, message: &str) -> Result<()> {
    let message = message.trim();
    if message.is_empty() {
        return Ok(());
    }

    let response = client.send(message).await?;
    for text in response.replies() {
        println!("{}: {}", AGENT_AUTHOR, text);
    }
    Ok(())
}

async fn run_tui(client: ChatClient) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let tx = events.sender();
    let mut app = App::new(client);

    let result = run_loop(&mut terminal, &mut app, &mut events, &tx).await;

    tui::restore()?;
    tracing::info!(messages = app.transcript.len(), "chat closed");
    result
}

async fn run_loop(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
    tx: &UnboundedSender<AppEvent>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event, tx),
            None => break,
        }
    }
    Ok(())
}
