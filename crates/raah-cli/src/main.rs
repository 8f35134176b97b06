use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use raah_core::{
    Config, HttpBackend, Notification, NotificationSink, Orchestrator, Preselection,
    ScriptureBackend,
};

mod output;

use output::ColorMode;

/// Raah: compare Bible chapters across versions from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the comparison service (default: http://127.0.0.1:5000)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available Bible versions
    Versions,

    /// List the books of a version
    Books {
        /// Version id, as shown by `versions`
        version: String,
    },

    /// Print a chapter side by side in up to four versions
    Compare {
        /// Comma-separated version ids (1 to 4)
        #[arg(long, value_delimiter = ',', required = true)]
        versions: Vec<String>,

        /// Book id, as shown by `books`
        #[arg(long)]
        book: String,

        /// Chapter number
        #[arg(long, default_value_t = 1)]
        chapter: u32,
    },

    /// Check that the service is up
    Health,
}

/// Forwards orchestrator notifications to the log.
struct TraceSink;

impl NotificationSink for TraceSink {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::ErrorRaised { operation, message } => {
                tracing::debug!(%operation, %message, "error raised");
            }
            other => tracing::trace!(?other, "notification"),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("RAAH_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Resolve config from CLI flags > env vars > config file > defaults
    let file = raah_core::config_file::load_config();
    let mut config = Config::resolve(&file);
    if let Some(base) = cli.api_base {
        config.base_url = base;
    }
    if let Some(secs) = cli.timeout.filter(|&s| s > 0) {
        config.request_timeout = Duration::from_secs(secs);
    }
    let color = ColorMode(!cli.no_color);
    let backend = HttpBackend::new(&config)?;

    match cli.command {
        Command::Versions => versions(&backend, color).await,
        Command::Books { version } => books(&backend, &version, color).await,
        Command::Compare {
            versions,
            book,
            chapter,
        } => compare(backend, versions, book, chapter, color).await,
        Command::Health => health(&backend, color).await,
    }
}

async fn versions(backend: &HttpBackend, color: ColorMode) -> anyhow::Result<()> {
    let editions = backend.list_editions().await?;
    output::print_editions(&mut std::io::stdout(), &editions, color)?;
    Ok(())
}

async fn books(backend: &HttpBackend, version: &str, color: ColorMode) -> anyhow::Result<()> {
    let books = backend.list_books(version).await?;
    output::print_books(&mut std::io::stdout(), version, &books, color)?;
    Ok(())
}

async fn health(backend: &HttpBackend, color: ColorMode) -> anyhow::Result<()> {
    let health = backend.health().await?;
    output::print_health(&mut std::io::stdout(), backend.base_url(), &health, color)?;
    Ok(())
}

/// Run the same startup cascade as the viewer, seeded with the requested
/// selection, and print the resulting comparison.
async fn compare(
    backend: HttpBackend,
    versions: Vec<String>,
    book: String,
    chapter: u32,
    color: ColorMode,
) -> anyhow::Result<()> {
    if versions.len() > raah_core::MAX_EDITIONS {
        anyhow::bail!(
            "at most {} versions can be compared, got {}",
            raah_core::MAX_EDITIONS,
            versions.len()
        );
    }

    let orchestrator = Orchestrator::new(Arc::new(backend), Arc::new(TraceSink));
    orchestrator
        .start_with(&Preselection {
            editions: versions.clone(),
            book: Some(book.clone()),
            chapter: Some(chapter),
        })
        .await;
    let snapshot = orchestrator.snapshot();

    if let Some(error) = &snapshot.error {
        output::print_error(&mut std::io::stderr(), error, color)?;
        std::process::exit(1);
    }

    let unknown: Vec<&str> = versions
        .iter()
        .filter(|id| !snapshot.editions.iter().any(|e| &e.id == *id))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        let available: Vec<&str> = snapshot.editions.iter().map(|e| e.id.as_str()).collect();
        anyhow::bail!(
            "unknown version(s): {} (available: {})",
            unknown.join(", "),
            available.join(", ")
        );
    }
    if snapshot.selection.book_id.as_deref() != Some(book.as_str()) {
        anyhow::bail!("unknown book {book:?}; see `raah books <version>`");
    }
    if snapshot.selection.chapter != chapter {
        anyhow::bail!(
            "chapter {chapter} is out of range (1-{})",
            snapshot.chapter_bound()
        );
    }

    let Some(payload) = snapshot.comparison else {
        anyhow::bail!("no comparison was returned");
    };
    let columns: Vec<(String, String)> = snapshot
        .selection
        .edition_ids
        .iter()
        .map(|id| {
            let label = snapshot
                .editions
                .iter()
                .find(|e| &e.id == id)
                .map_or_else(|| id.clone(), |e| e.abbreviation.clone());
            (id.clone(), label)
        })
        .collect();
    output::print_comparison(&mut std::io::stdout(), &payload, &columns, color)?;
    Ok(())
}
