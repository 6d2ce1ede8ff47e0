//! Service layer for the finance dashboard
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, manual-entry defaults, CSV parsing and bulk import.

pub mod import;
pub mod transaction;

pub use import::{parse_csv, parse_csv_detailed, ImportOutcome, ImportResult, ImportService};
pub use transaction::{CreateTransactionInput, TransactionService};
