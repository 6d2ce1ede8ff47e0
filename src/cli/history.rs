//! CLI command for the audit history

use crate::error::DashboardResult;
use crate::storage::Storage;

/// Print the active user's most recent audit entries, oldest first
pub fn handle_history_command(storage: &Storage, limit: usize) -> DashboardResult<()> {
    let entries = storage.audit().recent(limit)?;

    if entries.is_empty() {
        println!("No history recorded yet.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
