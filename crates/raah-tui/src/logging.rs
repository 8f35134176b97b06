//! File logging for the TUI. The terminal belongs to the UI, so log lines go
//! to a daily-rolling file under `<cache_dir>/raah/`.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Directory holding `raah-tui.log.<date>` files.
pub fn log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("raah"))
}

/// Install the global subscriber. The filter comes from `RAAH_LOG` and
/// defaults to `info`.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init() -> anyhow::Result<Option<WorkerGuard>> {
    let Some(dir) = log_dir() else {
        return Ok(None);
    };
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::daily(&dir, "raah-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("RAAH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;
    Ok(Some(guard))
}
