//! JSON store files
//!
//! Stores are replaced through a hidden sibling temp file and a rename, so a
//! crash mid-write leaves the previous store intact. Reading tells a store
//! that does not exist yet (a fresh user) apart from one that is damaged;
//! the latter is reported with its position so it can be repaired by hand.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::{DashboardError, DashboardResult};

/// Read a JSON store as an untyped value
///
/// Returns `None` for a missing or blank file. A leading byte-order mark is
/// ignored.
pub fn read_json_value(path: &Path) -> DashboardResult<Option<Value>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(DashboardError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    let text = text.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(text).map(Some).map_err(|e| {
        DashboardError::Storage(format!(
            "{} is damaged at line {}, column {} ({}). Move it aside to start a fresh store",
            path.display(),
            e.line(),
            e.column(),
            e
        ))
    })
}

/// Replace the store at `path` with `data`, pretty-printed
///
/// The file is either completely written or left untouched.
pub fn write_json_atomic<T: Serialize>(path: &Path, data: &T) -> DashboardResult<()> {
    let bytes = serde_json::to_vec_pretty(data).map_err(|e| {
        DashboardError::Storage(format!("Failed to serialize {}: {}", path.display(), e))
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DashboardError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    let result = write_and_sync(&temp_path, &bytes).and_then(|_| fs::rename(&temp_path, path));

    result.map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        DashboardError::Storage(format!("Failed to write {}: {}", path.display(), e))
    })
}

/// `.<name>.<pid>.tmp` next to the target, so two processes never share one
fn temp_path_for(path: &Path) -> DashboardResult<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        DashboardError::Storage(format!("{} is not a file path", path.display()))
    })?;

    Ok(path.with_file_name(format!(
        ".{}.{}.tmp",
        name.to_string_lossy(),
        std::process::id()
    )))
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_missing_and_blank_stores_are_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        assert!(read_json_value(&path).unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(read_json_value(&path).unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users").join("alice").join("transactions.json");

        let data = json!({ "transactions": [{ "category": "Dízimo", "value": 150.75 }] });
        write_json_atomic(&path, &data).unwrap();

        assert_eq!(read_json_value(&path).unwrap(), Some(data));
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        fs::write(&path, "\u{feff}[]").unwrap();

        assert_eq!(read_json_value(&path).unwrap(), Some(json!([])));
    }

    #[test]
    fn test_damaged_store_reports_position() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        fs::write(&path, "{\n  \"transactions\": [\n    {\"value\": 1,,}\n").unwrap();

        let err = read_json_value(&path).unwrap_err();
        assert!(matches!(err, DashboardError::Storage(_)));
        let message = err.to_string();
        assert!(message.contains("damaged at line 3"), "{}", message);
    }

    #[test]
    fn test_failed_write_keeps_previous_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        write_json_atomic(&path, &json!([1])).unwrap();

        // A directory squatting on the temp name makes the write fail
        fs::create_dir(temp_path_for(&path).unwrap()).unwrap();
        assert!(write_json_atomic(&path, &json!([2])).is_err());

        assert_eq!(read_json_value(&path).unwrap(), Some(json!([1])));
    }
}
