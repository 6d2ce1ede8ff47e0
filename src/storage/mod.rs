//! Storage layer
//!
//! Provides per-user JSON file storage with atomic writes and automatic
//! directory creation.

pub mod file_io;
pub mod transactions;

pub use file_io::{read_json_value, write_json_atomic};
pub use transactions::TransactionRepository;

use crate::audit::AuditLogger;
use crate::config::paths::DashboardPaths;
use crate::error::DashboardError;

/// Storage coordinator for one user's records
pub struct Storage {
    paths: DashboardPaths,
    user_id: String,
    pub transactions: TransactionRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Open storage scoped to `user_id`
    pub fn new(paths: DashboardPaths, user_id: impl Into<String>) -> Result<Self, DashboardError> {
        let user_id = user_id.into();
        if user_id.trim().is_empty()
            || user_id.contains(|c: char| c == '/' || c == '\\' || c == '.')
        {
            return Err(DashboardError::Config(format!(
                "Invalid user id '{}'",
                user_id
            )));
        }

        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file(&user_id)),
            audit: AuditLogger::for_user(&paths, &user_id),
            user_id,
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &DashboardPaths {
        &self.paths
    }

    /// User this storage is scoped to
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), DashboardError> {
        self.transactions.load()
    }
}
