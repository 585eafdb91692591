//! Error taxonomy for Vendcast.
//!
//! Each crate keeps its own error type (weather adapter, machine store) and
//! converts into [`AppError`] at the binary edge. `Display` is for logs;
//! `user_message()` is the one line printed to the terminal.

use thiserror::Error;

/// Every failure the binary can report.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("weather transport: {0}")]
    Network(#[from] NetworkError),

    #[error("machines database: {0}")]
    Database(#[from] DatabaseError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("weather: {0}")]
    Weather(#[from] WeatherError),

    #[error("machines: {0}")]
    Store(#[from] StoreError),

    #[error("file access: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Short message for the terminal.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Database(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Store(e) => e.user_message(),
            AppError::Io(_) => "Could not read or write a local file.",
            AppError::Other(_) => "Something went wrong. Run with RUST_LOG=debug for details.",
        }
    }
}

/// Transport failures talking to the weather API.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Could not connect: {0}")]
    ConnectionFailed(String),

    #[error("Timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Unreadable response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Could not reach the weather service. Check your connection."
            }
            NetworkError::Timeout => "The weather service did not answer in time.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather service is having problems. Try again later."
            }
            NetworkError::ServerError { .. } => "The weather service rejected the request.",
            NetworkError::InvalidResponse(_) => "The weather service sent an unexpected response.",
        }
    }
}

/// Failures of the SQLite machine database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Cannot open database: {0}")]
    ConnectionFailed(String),

    #[error("Statement failed: {0}")]
    QueryFailed(String),

    #[error("Database is corrupt: {0}")]
    Corruption(String),
}

impl DatabaseError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed(_) => "Could not open the machines database.",
            DatabaseError::QueryFailed(_) => "A machines database operation failed.",
            DatabaseError::Corruption(_) => {
                "The machines database is damaged. Move machines.db aside to start fresh."
            }
        }
    }
}

/// Problems with `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read or write config: {0}")]
    Unreadable(String),

    #[error("Invalid settings: {0}")]
    Invalid(String),

    #[error("Cannot parse config: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Unreadable(_) => "config.toml could not be read or written.",
            ConfigError::Invalid(_) => "config.toml has invalid settings.",
            ConfigError::ParseError(_) => "config.toml could not be parsed.",
        }
    }
}

/// Weather data problems after the transport succeeded.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Forecast request refused: {0}")]
    Rejected(String),

    #[error("Forecast service down")]
    Unavailable,

    #[error("Malformed forecast: {0}")]
    Malformed(String),

    #[error("Forecast cache: {0}")]
    Cache(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Rejected(_) => "Failed to fetch weather data. Please try again.",
            WeatherError::Unavailable => "The weather service is down. Try again later.",
            WeatherError::Malformed(_) => "Weather data could not be read.",
            WeatherError::Cache(_) => "Cached weather could not be used.",
        }
    }
}

/// Machine store errors surfaced to the user.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Machine not found: {0}")]
    NotFound(String),

    #[error("Invalid machine: {0}")]
    Validation(String),
}

impl StoreError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "Machine not found. It may have been removed.",
            StoreError::Validation(_) => "Some machine fields are invalid. Check and try again.",
        }
    }
}

/// Classify a reqwest failure.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            return NetworkError::Timeout;
        }
        if let Some(status) = self.status() {
            return NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            };
        }
        if self.is_decode() || self.is_body() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

/// Classify a rusqlite failure by its SQLite result code.
pub trait RusqliteErrorExt {
    fn into_database_error(self) -> DatabaseError;
}

impl RusqliteErrorExt for rusqlite::Error {
    fn into_database_error(self) -> DatabaseError {
        use rusqlite::ErrorCode;

        match self.sqlite_error_code() {
            Some(ErrorCode::DatabaseCorrupt) | Some(ErrorCode::NotADatabase) => {
                DatabaseError::Corruption(self.to_string())
            }
            Some(ErrorCode::CannotOpen) => DatabaseError::ConnectionFailed(self.to_string()),
            _ => DatabaseError::QueryFailed(self.to_string()),
        }
    }
}
