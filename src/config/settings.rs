//! User settings for the finance dashboard
//!
//! Manages user preferences: the active user scope, the default period filter,
//! display formats and the diagnostic log level.

use serde::{Deserialize, Serialize};

use super::paths::DashboardPaths;
use crate::error::DashboardError;
use crate::models::PeriodFilter;
use crate::storage::write_json_atomic;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// User whose records are read and written
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Period filter used when none is given on the command line
    #[serde(default)]
    pub default_period: PeriodFilter,

    /// Currency symbol shown in front of amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// How many entries the summary lists under "recent"
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Diagnostic log level (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_user_id() -> String {
    "default".to_string()
}

fn default_currency() -> String {
    "R$".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_recent_limit() -> usize {
    10
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            user_id: default_user_id(),
            default_period: PeriodFilter::default(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            recent_limit: default_recent_limit(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &DashboardPaths) -> Result<Self, DashboardError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                DashboardError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                DashboardError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &DashboardPaths) -> Result<(), DashboardError> {
        paths.ensure_directories()?;
        write_json_atomic(&paths.settings_file(), self)
    }
}
