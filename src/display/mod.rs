//! Display formatting for terminal output
//!
//! Provides utilities for formatting transactions and dashboard reports for
//! terminal display, with pt-BR currency and month labels.

pub mod currency;
pub mod report;
pub mod transaction;

pub use currency::format_currency;
pub use report::{format_dashboard, month_label, DashboardView, MONTH_LABELS_PT_BR};
pub use transaction::{
    format_date, format_transaction_details, format_transaction_register, format_transaction_row,
};
