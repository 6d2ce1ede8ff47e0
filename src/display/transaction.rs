//! Transaction display formatting
//!
//! Provides utilities for formatting transactions for terminal display,
//! including the register view used by `list` and the dashboard.

use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::models::Transaction;

use super::currency::format_currency;
use super::report::truncate;

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date with a user-supplied strftime pattern, falling back to ISO
/// when the pattern is invalid
pub fn format_date(date: NaiveDateTime, date_format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(date_format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", date.format(FALLBACK_DATE_FORMAT));
    }
    out
}

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction, date_format: &str, symbol: &str) -> String {
    let date = txn
        .date
        .map(|d| format_date(d, date_format))
        .unwrap_or_else(|| "(no date)".to_string());
    let marker = if txn.is_revenue() { "+" } else { "-" };

    format!(
        "{} {:10} {:20} {:>16} {:24} {}",
        marker,
        date,
        truncate(&txn.category, 20),
        format_currency(txn.value, symbol),
        truncate(&txn.description, 24),
        txn.payment_method
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(
    transactions: &[Transaction],
    date_format: &str,
    symbol: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:1} {:10} {:20} {:>16} {:24} {}\n",
        "", "Date", "Category", "Value", "Description", "Payment"
    ));
    output.push_str(&"-".repeat(86));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, date_format, symbol));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, date_format: &str, symbol: &str) -> String {
    let mut output = String::new();

    if let Some(id) = txn.id {
        output.push_str(&format!("Transaction: {}\n", id));
    }
    if let Some(date) = txn.date {
        output.push_str(&format!("Date:        {}\n", format_date(date, date_format)));
    }
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Value:       {}\n", format_currency(txn.value, symbol)));
    output.push_str(&format!("Category:    {}\n", txn.category));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }
    output.push_str(&format!("Payment:     {}\n", txn.payment_method));

    if let Some(file) = &txn.file_name {
        output.push_str(&format!("Receipt:     {}\n", file));
    }

    output
}
