//! CLI commands for reports
//!
//! Renders the dashboard summary, either for the terminal or as JSON.

use chrono::NaiveDateTime;
use clap::Args;

use crate::config::settings::Settings;
use crate::display::{format_dashboard, DashboardView};
use crate::error::DashboardResult;
use crate::models::PeriodFilter;
use crate::reports::aggregate;
use crate::services::TransactionService;
use crate::storage::Storage;

/// Arguments for `summary`
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Period to aggregate (all, this-year, this-month); defaults to the setting
    #[arg(short, long)]
    pub period: Option<PeriodFilter>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the summary command
pub fn handle_summary_command(
    storage: &Storage,
    settings: &Settings,
    args: SummaryArgs,
    now: NaiveDateTime,
) -> DashboardResult<()> {
    let period = args.period.unwrap_or(settings.default_period);
    let transactions = TransactionService::new(storage).list()?;
    let summary = aggregate(&transactions, period, now);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let view = DashboardView {
        currency_symbol: &settings.currency_symbol,
        date_format: &settings.date_format,
        recent_limit: settings.recent_limit,
    };
    print!("{}", format_dashboard(&summary, &view));
    Ok(())
}
