use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use geeklife::config;

/// Keeps the background log writer alive; logs are flushed when dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

fn ensure_log_dir(home: Option<&Path>) -> std::io::Result<PathBuf> {
    let dir = match home {
        Some(home) => config::config_dir(home).join("logs"),
        None => std::env::temp_dir().join("geeklife").join("logs"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Logs go to a daily file; the terminal belongs to the UI.
pub fn init(home: Option<&Path>) -> Option<LoggingGuard> {
    let log_dir = ensure_log_dir(home)
        .or_else(|_| ensure_log_dir(None))
        .ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "geeklife.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("geeklife=info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
