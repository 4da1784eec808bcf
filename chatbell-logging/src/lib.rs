use std::path::{Path, PathBuf};

use tracing_subscriber::{
    Layer, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
};

/// Resolve the directory log files are written to.
///
/// `state_home` is the value of `$XDG_STATE_HOME` if set; otherwise the
/// directory falls back to `~/.local/state`. Returns `None` only when neither
/// is available.
pub fn log_directory(state_home: Option<&Path>) -> Option<PathBuf> {
    let base = match state_home {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => home::home_dir()?.join(".local").join("state"),
    };
    Some(base.join("chatbell"))
}

fn stderr_layer<S>() -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
}

/// Initialize the tracing subscriber with dual output:
/// - Rolling daily log file at `~/.local/state/chatbell/<log_name>` (DEBUG level)
/// - stderr filtered by `RUST_LOG` (defaults to WARN when unset)
///
/// Returns a guard that must be held for the lifetime of the program
/// to ensure the non-blocking file writer flushes on drop.
pub fn init_logging(log_name: &str) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let state_home = std::env::var_os("XDG_STATE_HOME").map(PathBuf::from);
    let Some(log_dir) = log_directory(state_home.as_deref()) else {
        eprintln!("Warning: could not determine log directory, logging to stderr only");
        tracing_subscriber::registry().with(stderr_layer()).init();
        return None;
    };
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!(
            "Warning: could not create log directory {:?}: {}",
            log_dir, e
        );
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, log_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .with(stderr_layer())
        .init();

    Some(guard)
}
