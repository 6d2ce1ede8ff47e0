//! Per-user audit trail
//!
//! Each user has their own `audit.log` next to their transactions. Every
//! created transaction becomes one JSON line; a batch is appended with a
//! single write. Reading only ever yields the owning user's entries and skips
//! a line torn by an interrupted append.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::paths::DashboardPaths;
use crate::error::{DashboardError, DashboardResult};
use crate::models::Transaction;

use super::entry::{AuditEntry, Operation};

/// Appends to and reads back one user's audit log
pub struct AuditLogger {
    log_path: PathBuf,
    user_id: String,
}

impl AuditLogger {
    /// Logger for `user_id`'s log under `paths`
    pub fn for_user(paths: &DashboardPaths, user_id: &str) -> Self {
        Self {
            log_path: paths.audit_log(user_id),
            user_id: user_id.to_string(),
        }
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Record the creation of `transactions` under `operation`
    pub fn record(&self, operation: Operation, transactions: &[Transaction]) -> DashboardResult<()> {
        if transactions.is_empty() {
            return Ok(());
        }

        let mut lines = String::new();
        for txn in transactions {
            let entry = AuditEntry::record(operation, &self.user_id, txn);
            lines.push_str(&serde_json::to_string(&entry)?);
            lines.push('\n');
        }

        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| DashboardError::Io(format!("Failed to open audit log: {}", e)))?;

        file.write_all(lines.as_bytes())
            .map_err(|e| DashboardError::Io(format!("Failed to append audit entries: {}", e)))
    }

    /// This user's entries, oldest first
    pub fn entries(&self) -> DashboardResult<Vec<AuditEntry>> {
        let text = match fs::read_to_string(&self.log_path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DashboardError::Io(format!("Failed to read audit log: {}", e))),
        };

        let mut entries = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditEntry>(line) {
                Ok(entry) if entry.user_id == self.user_id => entries.push(entry),
                Ok(_) => {}
                Err(e) => warn!(line = idx + 1, error = %e, "Skipping unreadable audit entry"),
            }
        }

        Ok(entries)
    }

    /// The latest `count` entries for this user, oldest first
    pub fn recent(&self, count: usize) -> DashboardResult<Vec<AuditEntry>> {
        let mut entries = self.entries()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionId, TransactionType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn stored(value: f64) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Transaction::new(TransactionType::Expense, date, value, "Aluguel")
            .with_id(TransactionId::new())
    }

    fn logger(temp_dir: &TempDir, user: &str) -> AuditLogger {
        AuditLogger::for_user(&DashboardPaths::with_base_dir(temp_dir.path().to_path_buf()), user)
    }

    #[test]
    fn test_record_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let alice = logger(&temp_dir, "alice");

        alice.record(Operation::Create, &[stored(1.0)]).unwrap();
        alice
            .record(Operation::Import, &[stored(2.0), stored(3.0)])
            .unwrap();

        let entries = alice.entries().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].operation, Operation::Create);
        assert!(entries[1..].iter().all(|e| e.operation == Operation::Import));
        assert!(entries.iter().all(|e| e.user_id == "alice"));
    }

    #[test]
    fn test_empty_batch_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let alice = logger(&temp_dir, "alice");

        alice.record(Operation::Import, &[]).unwrap();
        assert!(!alice.path().exists());
        assert!(alice.entries().unwrap().is_empty());
    }

    #[test]
    fn test_users_do_not_see_each_other() {
        let temp_dir = TempDir::new().unwrap();
        let alice = logger(&temp_dir, "alice");
        let bob = logger(&temp_dir, "bob");

        alice.record(Operation::Create, &[stored(999.0)]).unwrap();

        assert_eq!(alice.recent(10).unwrap().len(), 1);
        assert!(bob.recent(10).unwrap().is_empty());
    }

    #[test]
    fn test_foreign_and_torn_lines_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let alice = logger(&temp_dir, "alice");
        alice.record(Operation::Create, &[stored(1.0)]).unwrap();

        let foreign = AuditEntry::record(Operation::Create, "mallory", &stored(5.0));
        let mut file = OpenOptions::new().append(true).open(alice.path()).unwrap();
        writeln!(file, "{}", serde_json::to_string(&foreign).unwrap()).unwrap();
        write!(file, "{{\"timestamp\": \"2024-").unwrap();

        let entries = alice.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id, "alice");
    }

    #[test]
    fn test_recent_keeps_the_latest() {
        let temp_dir = TempDir::new().unwrap();
        let alice = logger(&temp_dir, "alice");
        let batch: Vec<Transaction> = (0..10).map(|i| stored(i as f64)).collect();
        alice.record(Operation::Import, &batch).unwrap();

        let recent = alice.recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].entity_id, batch[7].id.unwrap().as_uuid().to_string());
        assert_eq!(recent[2].entity_id, batch[9].id.unwrap().as_uuid().to_string());
    }
}
