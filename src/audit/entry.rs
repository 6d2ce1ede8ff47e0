//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// How a transaction came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Entered manually, one at a time
    Create,
    /// Created as part of a CSV bulk import
    Import,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Import => write!(f, "IMPORT"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// User whose store was written
    pub user_id: String,

    /// Full UUID of the created transaction
    pub entity_id: String,

    /// Snapshot of the transaction as stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Build an entry recording the creation of `txn`
    pub fn record(operation: Operation, user_id: impl Into<String>, txn: &Transaction) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            user_id: user_id.into(),
            entity_id: txn.id.map(|id| id.as_uuid().to_string()).unwrap_or_default(),
            after: serde_json::to_value(txn).ok(),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.user_id,
            self.entity_id
        );

        if let Some(after) = &self.after {
            let category = after.get("category").and_then(|v| v.as_str()).unwrap_or("");
            let value = after.get("value").and_then(|v| v.as_f64()).unwrap_or(0.0);
            output.push_str(&format!(" ({} {:.2})", category, value));
        }

        output
    }
}
