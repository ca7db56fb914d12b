//! Terminal chat client.
//!
//! Run with: cargo run -p tui-chat -- --url ws://localhost:12345/ws
//!
//! Logs go to a file (see `--log-file`) so they don't tear the screen.

use std::{
    fs::{self, File},
    io,
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use socket_chat_core::ChatConfig;
use socket_chat_transport::{
    ChatView, SocketService,
    tui::{self, KeyOutcome},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long to wait for the close frame on quit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Terminal chat client over a single WebSocket.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// WebSocket endpoint of the chat relay [default: $CHAT_WS_URL, then
    /// ws://localhost:12345/ws].
    #[arg(long)]
    url: Option<String>,

    /// Where to write logs. Defaults to the user cache directory.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file)?;
    let config = cli.url.map_or_else(ChatConfig::from_env, ChatConfig::new);
    tracing::info!(url = %config.url, "Starting chat client");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn init_tracing(log_file: Option<PathBuf>) -> Result<()> {
    let path = match log_file {
        Some(path) => path,
        None => {
            let dir = dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("tui-chat");
            fs::create_dir_all(&dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            dir.join("tui-chat.log")
        }
    };
    let file = File::create(&path).with_context(|| format!("opening {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ChatConfig,
) -> Result<()> {
    let service = SocketService::connect(config);
    let events = service.subscribe();
    let mut view = ChatView::new(service, events);

    loop {
        view.poll_events();

        terminal.draw(|f| tui::draw(f, &view))?;

        if event::poll(Duration::from_millis(50))?
            && tui::handle_event(&mut view, &event::read()?) == KeyOutcome::Quit
        {
            if !view.sink().shutdown(SHUTDOWN_GRACE).await {
                tracing::warn!("Socket did not close within {SHUTDOWN_GRACE:?}");
            }
            return Ok(());
        }
    }
}
