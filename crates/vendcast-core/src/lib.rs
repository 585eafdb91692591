pub mod config;
pub mod error;

pub use config::{
    Config, ConfigIssue, ConfigReport, DisplayConfig, MachinesConfig, MarginUnit, StoreBackend,
    StoreConfig, WeatherConfig,
};
pub use error::{
    AppError, ConfigError, DatabaseError, NetworkError, ReqwestErrorExt, RusqliteErrorExt,
    StoreError, WeatherError,
};

use anyhow::Result;

/// Initialize logging for the application
///
/// Logs go to stderr; stdout carries the dashboard output.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Vendcast core initialized");
    Ok(())
}
