//! Process-wide logging.
//!
//! [`Telemetry`] is built from the `[app]` settings in `main`, initialised
//! once before anything logs and shut down on exit.

use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

use crate::settings::{App, LogFormat};

const CRATES: [&str; 5] = ["expense_tracker", "server", "engine", "migration", "tower_http"];

#[derive(Debug)]
pub struct Telemetry {
    level: String,
    format: LogFormat,
}

impl Telemetry {
    pub fn new(settings: &App) -> Self {
        Self {
            level: settings.level.clone(),
            format: settings.log_format.clone(),
        }
    }

    /// Default filter: the configured level for the workspace crates.
    /// `RUST_LOG` takes precedence when set.
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let directives = CRATES
                .iter()
                .map(|krate| format!("{krate}={}", self.level))
                .collect::<Vec<_>>()
                .join(",");
            EnvFilter::new(directives)
        })
    }

    /// Installs the global subscriber.
    pub fn init(&self) -> Result<(), TryInitError> {
        let registry = tracing_subscriber::registry().with(self.filter());
        match self.format {
            LogFormat::Json => registry
                .with(fmt::layer().json().with_current_span(false))
                .try_init(),
            LogFormat::Text => registry
                .with(fmt::layer().with_target(true).with_line_number(true))
                .try_init(),
        }
    }

    pub fn shutdown(self) {
        tracing::info!("shutting down");
    }
}
