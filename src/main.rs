use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing_subscriber::EnvFilter;

use petal::app::App;
use petal::config::Config;
use petal::services::api::{spawn_worker, ApiClient, ApiEvent};
use petal::services::session;

/// Terminal browser for a personal blog and art gallery.
#[derive(Parser, Debug)]
#[command(name = "petal", version, about)]
struct Args {
    /// Config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Append logs to this file (controlled by RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &PathBuf) -> anyhow::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("petal=info")),
        )
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    if let Some(base) = args.api_base {
        config.api_base = base;
    }
    tracing::info!(api_base = %config.api_base, "starting");

    let (events_tx, events_rx) = channel();
    let client = ApiClient::new(config.api_base.clone());
    let jobs = spawn_worker(client, events_tx).context("spawning api worker")?;
    let mut app = App::new(config, config_path, jobs, session::default_path());

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app, events_rx);
    ratatui::restore();
    result
}

fn run(
    terminal: &mut Terminal<impl Backend>,
    app: &mut App,
    events: Receiver<ApiEvent>,
) -> anyhow::Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| app.render(frame))?;

        while let Ok(completion) = events.try_recv() {
            app.apply_event(completion);
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }
    Ok(())
}
