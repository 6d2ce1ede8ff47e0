//! Strongly-typed identifier for persisted transactions
//!
//! Identifiers are opaque to the core; only the storage layer assigns them.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const DISPLAY_PREFIX: &str = "txn-";

/// Identifier assigned to a transaction when it is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DISPLAY_PREFIX, &self.0.to_string()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = TransactionId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("txn-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_id_uniqueness() {
        assert_ne!(TransactionId::new(), TransactionId::new());
    }

    #[test]
    fn test_id_is_stored_as_bare_uuid() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: TransactionId = serde_json::from_str(&format!("\"{}\"", uuid_str)).unwrap();

        assert_eq!(id.as_uuid().to_string(), uuid_str);
        assert_eq!(id.to_string(), "txn-550e8400");
        assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{}\"", uuid_str));
    }
}
