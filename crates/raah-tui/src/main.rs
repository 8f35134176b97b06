use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;

use raah_core::{Config, HttpBackend, Intent, Notification, Orchestrator, Preselection};

mod action;
mod app;
mod input;
mod logging;
mod model;
mod theme;
mod view;

use app::App;

/// Raah TUI: compare Bible chapters side by side in up to four versions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the comparison service (default: http://127.0.0.1:5000)
    #[arg(long)]
    api_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Comma-separated version ids to open with
    #[arg(long, value_delimiter = ',')]
    versions: Vec<String>,

    /// Book id to open with
    #[arg(long)]
    book: Option<String>,

    /// Chapter to open with (needs --book)
    #[arg(long, requires = "book")]
    chapter: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = logging::init()?;

    // Resolve config from CLI flags > env vars > config file > defaults
    let file = raah_core::config_file::load_config();
    let mut config = Config::resolve(&file);
    if let Some(base) = args.api_base {
        config.base_url = base;
    }
    if let Some(secs) = args.timeout.filter(|&s| s > 0) {
        config.request_timeout = Duration::from_secs(secs);
    }
    tracing::info!(base_url = %config.base_url, "starting");

    let display = file.display.clone().unwrap_or_default();
    let theme_name = args
        .theme
        .or(display.theme)
        .unwrap_or_else(|| "hacker".to_string());
    let fps = display.fps.unwrap_or(10).clamp(1, 60);

    let saved = file.selection.clone().unwrap_or_default();
    let preselection = Preselection {
        editions: if args.versions.is_empty() {
            saved.editions.unwrap_or_default()
        } else {
            args.versions
        },
        book: args.book.or(saved.book),
        chapter: args.chapter,
    };

    let backend = HttpBackend::new(&config)?;

    let (note_tx, mut note_rx) = mpsc::unbounded_channel::<Notification>();
    let (intent_tx, mut intent_rx) = mpsc::unbounded_channel::<Intent>();
    let orchestrator = Orchestrator::new(Arc::new(backend), Arc::new(note_tx));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(theme::Theme::by_name(&theme_name));
    app.intent_tx = Some(intent_tx);

    // Startup cascade
    let startup = orchestrator.clone();
    tokio::spawn(async move {
        startup.start_with(&preselection).await;
    });

    // Intent listener: each intent runs as its own task so a slow fetch never
    // blocks the next key press. Stale results are dropped by the orchestrator.
    let listener = orchestrator.clone();
    tokio::spawn(async move {
        while let Some(intent) = intent_rx.recv().await {
            let orchestrator = listener.clone();
            tokio::spawn(async move {
                orchestrator.dispatch(intent).await;
            });
        }
    });

    // Main event loop
    let tick_rate = Duration::from_millis(1000 / u64::from(fps));

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_note = note_rx.recv() => {
                if let Some(note) = maybe_note {
                    app.handle_notification(note);
                    // Drain any additional queued notifications
                    while let Ok(note) = note_rx.try_recv() {
                        app.handle_notification(note);
                    }
                }
            }
            // Terminal input events
            _ = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let action = input::map_event(&evt, &app.input_mode);
                        app.update(action);
                    }
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    tracing::info!("exiting");
    Ok(())
}
