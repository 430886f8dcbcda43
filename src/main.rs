//! Coastal Membership - terminal signup wizard and admin console
//!
//! A Ratatui-based TUI that walks applicants through the Coastal Grand
//! Hotel membership form and lets staff review stored applications.

mod admin;
mod app;
mod catalogue;
mod config;
mod gateway;
mod platform;
mod state;
mod storage;
mod ui;
mod wizard;

use anyhow::Result;
use app::App;
use config::MembershipConfig;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "coastal-membership.log";

/// Log to a file in the data directory; the terminal belongs to the UI.
/// Falls back to stderr when the file cannot be opened.
fn init_logging(data_dir: &Path) {
    let file = fs::create_dir_all(data_dir).and_then(|()| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(data_dir.join(LOG_FILE))
    });

    let (file_layer, stderr_layer) = match file {
        Ok(file) => (
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
            None,
        ),
        Err(_) => (None, Some(fmt::layer().with_writer(io::stderr))),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coastal_membership=info".into()),
        )
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = MembershipConfig::load()?;
    init_logging(&config.data_dir());

    // Create app before touching the terminal so startup errors print cleanly
    let mut app = App::new(config)?;
    tracing::info!("Starting with data directory {}", app.data_dir().display());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!("Exiting after error: {err:?}");
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Advance debounced saves and the submission loader
        app.tick(Instant::now());

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Faster polling while the loader animates (16ms = ~60fps)
        let poll_duration = if app.is_submitting() {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(poll_duration)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key).await?;
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
