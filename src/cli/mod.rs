//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod history;
pub mod import;
pub mod report;
pub mod transaction;

pub use history::handle_history_command;
pub use import::{handle_import_command, ImportArgs};
pub use report::{handle_summary_command, SummaryArgs};
pub use transaction::{handle_add_command, handle_list_command, AddArgs, ListArgs};
