//! Tracing setup for the `planetoid` binary.
//!
//! Logs go to stderr so that commands printing documents on stdout
//! (`planetoid opml`) stay pipeable. A `[logging] file` copies every line
//! into that file as well.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Map a configured level name to a `tracing` level; unknown names mean `info`.
fn level_from_name(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// `RUST_LOG` directives, with the configured level as the floor.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(level_from_name(level).into())
}

/// Install the global subscriber described by `config`.
///
/// Fails if the log file or its directory cannot be created.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let Some(path) = config.file.as_deref().map(Path::new) else {
        init_console_only(&config.level);
        return Ok(());
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let writer = std::io::stderr.and(Arc::new(File::create(path)?));

    // No colour codes: the same lines end up in the file
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .with(build_filter(&config.level))
        .init();

    Ok(())
}

/// Install a stderr-only subscriber; used before settings are loaded.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(build_filter(level))
        .init();
}
