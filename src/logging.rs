//! Console and rolling-file logging for the binary.

use std::path::Path;
use tracing::{Level, debug};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Daily rolling writer under `log_dir`, or `None` if the directory or the
/// appender cannot be created
pub fn file_writer(log_dir: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("warning: file logging disabled, cannot create {}: {}", log_dir.display(), e);
        return None;
    }

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("lingo")
        .filename_suffix("log")
        .build(log_dir);

    match appender {
        Ok(appender) => Some(tracing_appender::non_blocking(appender)),
        Err(e) => {
            eprintln!("warning: file logging disabled: {}", e);
            None
        }
    }
}

/// Console and file levels; the file keeps more than the console
pub fn levels(verbose: bool) -> (Level, LevelFilter) {
    if verbose {
        (Level::DEBUG, LevelFilter::DEBUG)
    } else {
        (Level::WARN, LevelFilter::INFO)
    }
}

/// Setup logging to stderr and, when possible, a daily rolling file.
///
/// The console follows `RUST_LOG` on top of `WARN` (`DEBUG` with `verbose`)
/// so stdout and stderr stay readable; the file always keeps `INFO` and up.
/// The returned guard must live until exit to flush the file.
pub fn setup_logging(verbose: bool, log_dir: &Path) -> Option<WorkerGuard> {
    let (console_level, file_level) = levels(verbose);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .with_filter(EnvFilter::from_default_env().add_directive(console_level.into()));

    let (file_layer, guard) = match file_writer(log_dir) {
        Some((writer, guard)) => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false) // No ANSI colors in file
                .with_filter(file_level);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("warning: failed to initialize logging: {}", e);
        return guard;
    }

    debug!("Logging initialized - console: {}, file: {}", console_level, log_dir.display());
    guard
}
