//! Transaction repository for JSON storage
//!
//! Manages loading and saving one user's transactions to their
//! `transactions.json`. Records are only ever inserted.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::DashboardError;
use crate::models::{Transaction, TransactionId};

use super::file_io::{read_json_value, write_json_atomic};

/// On-disk layout of a user's store
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Layouts accepted when loading: the current wrapper, or the bare list
/// exported by earlier versions
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum StoredTransactions {
    Current(TransactionData),
    Legacy(Vec<Transaction>),
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<Vec<Transaction>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load transactions from disk
    ///
    /// A store in the legacy bare-list layout is accepted and rewritten in
    /// the current layout on the next save.
    pub fn load(&self) -> Result<(), DashboardError> {
        let loaded = match read_json_value(&self.path)? {
            None => Vec::new(),
            Some(value) => match serde_json::from_value(value) {
                Ok(StoredTransactions::Current(data)) => data.transactions,
                Ok(StoredTransactions::Legacy(list)) => list,
                Err(e) => {
                    return Err(DashboardError::Storage(format!(
                        "{} does not hold a transaction list: {}",
                        self.path.display(),
                        e
                    )))
                }
            },
        };

        let mut data = self.data.write().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        *data = loaded;
        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), DashboardError> {
        let data = self.data.read().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut transactions = data.clone();
        transactions.sort_by(by_date_desc);

        let file_data = TransactionData { transactions };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get all transactions ordered by date, newest first
    ///
    /// Records without a usable date sort last.
    pub fn get_all(&self) -> Result<Vec<Transaction>, DashboardError> {
        let data = self.data.read().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut transactions = data.clone();
        transactions.sort_by(by_date_desc);
        Ok(transactions)
    }

    /// Assign an identifier and store one transaction in memory
    pub fn insert(&self, txn: Transaction) -> Result<Transaction, DashboardError> {
        let mut data = self.data.write().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let stored = txn.with_id(TransactionId::new());
        data.push(stored.clone());
        Ok(stored)
    }

    /// Assign identifiers and store a batch in memory under a single lock
    pub fn insert_many(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, DashboardError> {
        let mut data = self.data.write().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let stored: Vec<Transaction> = transactions
            .into_iter()
            .map(|txn| txn.with_id(TransactionId::new()))
            .collect();
        data.extend(stored.iter().cloned());
        Ok(stored)
    }

    /// Drop the given records from memory (used to undo a failed save)
    pub(crate) fn discard(&self, ids: &[TransactionId]) -> Result<(), DashboardError> {
        let mut data = self.data.write().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.retain(|t| t.id.map_or(true, |id| !ids.contains(&id)));
        Ok(())
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, DashboardError> {
        let data = self.data.read().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

fn by_date_desc(a: &Transaction, b: &Transaction) -> Ordering {
    match (a.date, b.date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
