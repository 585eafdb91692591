//! Machine storage backend trait and error types.
//!
//! This module defines the `MachineBackend` trait implemented by the SQLite
//! and in-memory stores.

use thiserror::Error;
use vendcast_core::{AppError, MarginUnit, RusqliteErrorExt, StoreError};
use vendcast_forecast::{Machine, MachineInput};

use crate::validation::{validate_input, ValidationErrors};

/// Errors that can occur during machine store operations.
#[derive(Debug, Error)]
pub enum MachineStoreError {
    /// No machine with this id.
    #[error("Machine not found: {0}")]
    NotFound(String),

    /// Input failed field validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Database failure.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Generic error wrapper.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MachineStoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}

impl From<MachineStoreError> for AppError {
    fn from(e: MachineStoreError) -> Self {
        match e {
            MachineStoreError::NotFound(id) => AppError::Store(StoreError::NotFound(id)),
            MachineStoreError::Validation(errors) => {
                AppError::Store(StoreError::Validation(errors.to_string()))
            }
            MachineStoreError::Storage(e) => AppError::Database(e.into_database_error()),
            MachineStoreError::Other(e) => AppError::Other(e),
        }
    }
}

/// Result type for machine store operations.
pub type MachineStoreResult<T> = Result<T, MachineStoreError>;

/// Trait for machine storage backends.
///
/// Inputs reaching `add` and `update` carry the margin as a fraction and are
/// validated again by every backend.
pub trait MachineBackend: Send {
    /// All machines in insertion order.
    fn list(&self) -> MachineStoreResult<Vec<Machine>>;

    /// Get a machine by id.
    ///
    /// Returns `None` if the machine doesn't exist.
    fn get(&self, id: &str) -> MachineStoreResult<Option<Machine>>;

    /// Add a machine under a freshly generated id.
    ///
    /// # Errors
    /// Returns `MachineStoreError::Validation` if the input is invalid.
    fn add(&self, input: MachineInput) -> MachineStoreResult<Machine>;

    /// Replace every field but the id.
    ///
    /// # Errors
    /// Returns `MachineStoreError::NotFound` if the machine doesn't exist.
    /// Returns `MachineStoreError::Validation` if the input is invalid.
    fn update(&self, id: &str, input: MachineInput) -> MachineStoreResult<Machine>;

    /// Remove a machine.
    ///
    /// # Errors
    /// Returns `MachineStoreError::NotFound` if the machine doesn't exist.
    fn remove(&self, id: &str) -> MachineStoreResult<()>;

    /// Owned copy of the current machines, handed to the forecast engine.
    fn snapshot(&self) -> MachineStoreResult<Vec<Machine>> {
        self.list()
    }

    /// Number of stored machines.
    fn count(&self) -> MachineStoreResult<usize> {
        Ok(self.list()?.len())
    }
}

/// Validate input already expressed as a fraction.
pub fn check_input(input: MachineInput) -> MachineStoreResult<MachineInput> {
    Ok(validate_input(input, MarginUnit::Fraction)?)
}

/// New opaque machine id: `machine-` plus 8 hex characters.
pub fn generate_machine_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("machine-{}", &uuid[..8])
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_generated_id_shape() {
        let id = generate_machine_id();
        let suffix = id.strip_prefix("machine-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(generate_machine_id(), generate_machine_id());
    }

    #[test]
    fn test_error_mapping() {
        let app: AppError = MachineStoreError::not_found("machine-001").into();
        assert!(matches!(app, AppError::Store(StoreError::NotFound(ref id)) if id == "machine-001"));

        let mut errors = ValidationErrors::default();
        errors.add("name", "Name is required.");
        let app: AppError = MachineStoreError::from(errors).into();
        assert!(matches!(app, AppError::Store(StoreError::Validation(_))));

        let app: AppError = MachineStoreError::Storage(rusqlite::Error::QueryReturnedNoRows).into();
        assert!(matches!(app, AppError::Database(_)));
    }
}
