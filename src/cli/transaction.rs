//! Transaction CLI commands
//!
//! Implements the `add` and `list` commands.

use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;

use crate::config::settings::Settings;
use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::{DashboardError, DashboardResult};
use crate::models::{PeriodFilter, TransactionType};
use crate::services::{CreateTransactionInput, TransactionService};
use crate::storage::Storage;

/// Arguments for `add`
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Amount (e.g., "150.75" or "1.234,56")
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Category label
    #[arg(short, long)]
    pub category: String,

    /// revenue or expense
    #[arg(short = 't', long = "type", default_value = "revenue")]
    pub kind: TransactionType,

    /// Transaction date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Payment method, defaults to PIX
    #[arg(short, long)]
    pub payment_method: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Name of an attached receipt file
    #[arg(short, long = "file")]
    pub file_name: Option<String>,
}

/// Arguments for `list`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Period to show (all, this-year, this-month); defaults to the setting
    #[arg(short, long)]
    pub period: Option<PeriodFilter>,

    /// Number of transactions to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Handle the `add` command
pub fn handle_add_command(
    storage: &Storage,
    settings: &Settings,
    args: AddArgs,
    today: NaiveDate,
) -> DashboardResult<()> {
    let value = parse_value(&args.value)?;

    let date = match &args.date {
        Some(date_str) => NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
            DashboardError::Validation(format!(
                "Invalid date format: '{}'. Use YYYY-MM-DD",
                date_str
            ))
        })?,
        None => today,
    };

    let mut input = CreateTransactionInput::new(date, value, args.category);
    input.kind = args.kind;
    input.description = args.description;
    input.payment_method = args.payment_method;
    input.file_name = args.file_name;

    let txn = TransactionService::new(storage).create(input)?;

    println!("Transaction recorded.");
    print!(
        "{}",
        format_transaction_details(&txn, &settings.date_format, &settings.currency_symbol)
    );
    Ok(())
}

/// Handle the `list` command
pub fn handle_list_command(
    storage: &Storage,
    settings: &Settings,
    args: ListArgs,
    now: NaiveDateTime,
) -> DashboardResult<()> {
    let period = args.period.unwrap_or(settings.default_period);
    let transactions =
        TransactionService::new(storage).list_in_period(period, now, Some(args.limit))?;

    println!("Transactions ({})", period);
    print!(
        "{}",
        format_transaction_register(
            &transactions,
            &settings.date_format,
            &settings.currency_symbol
        )
    );
    Ok(())
}

/// Parse an amount typed on the command line
///
/// A comma marks pt-BR notation (`1.234,56`); otherwise `.` is the decimal
/// separator.
fn parse_value(raw: &str) -> DashboardResult<f64> {
    let trimmed = raw.trim().trim_start_matches("R$").trim();
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            DashboardError::Validation(format!(
                "Invalid amount: '{}'. Use a number like '150.75' or '1.234,56'",
                raw
            ))
        })
}
