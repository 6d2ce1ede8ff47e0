//! Path management for the finance dashboard
//!
//! Provides XDG-compliant path resolution for configuration, data, and the audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `FINANCE_DASHBOARD_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/finance-dashboard` or `~/.config/finance-dashboard`
//! 3. Windows: `%APPDATA%\finance-dashboard`

use std::path::PathBuf;

use crate::error::DashboardError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "FINANCE_DASHBOARD_DATA_DIR";

/// Manages all paths used by the dashboard
#[derive(Debug, Clone)]
pub struct DashboardPaths {
    base_dir: PathBuf,
}

impl DashboardPaths {
    /// Create a new DashboardPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, DashboardError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) => PathBuf::from(custom),
            Err(_) => resolve_default_path()?,
        };

        Ok(Self::with_base_dir(base_dir))
    }

    /// Create DashboardPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the directory holding one user's records
    pub fn user_dir(&self, user_id: &str) -> PathBuf {
        self.data_dir().join("users").join(user_id)
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to a user's audit log
    pub fn audit_log(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("audit.log")
    }

    /// Get the path to a user's transactions.json
    pub fn transactions_file(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("transactions.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), DashboardError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| DashboardError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| DashboardError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the dashboard has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, DashboardError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                DashboardError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("finance-dashboard"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, DashboardError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| DashboardError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("finance-dashboard"))
}
