mod cli;
mod format;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use wealthtrack::config::{LogFormat, Settings};

pub(crate) use cli::as_cli;

/// Logs go to stderr so command output stays clean on stdout.
pub(crate) fn init_tracing(settings: &Settings) {
    let filter =
        EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match settings.log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
