//! CLI command handler for CSV import
//!
//! Imports every row of a bank/treasury CSV export as one bulk write and
//! reports which rows were skipped.

use std::path::PathBuf;

use clap::Args;

use crate::display::format_currency;
use crate::error::DashboardResult;
use crate::models::TransactionType;
use crate::services::ImportService;
use crate::storage::Storage;

/// Arguments for `import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to a semicolon-delimited .csv file
    pub file: PathBuf,

    /// Type applied to every imported row (revenue or expense)
    #[arg(short = 't', long = "type", default_value = "revenue")]
    pub kind: TransactionType,
}

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    currency_symbol: &str,
    args: ImportArgs,
) -> DashboardResult<()> {
    let result = ImportService::new(storage).import_file(&args.file, args.kind)?;

    let total: f64 = result.imported.iter().map(|t| t.value).sum();

    println!("Import Complete!");
    println!("  File:        {}", args.file.display());
    println!("  Type:        {}", args.kind);
    println!("  Imported:    {}", result.imported.len());
    println!("  Total:       {}", format_currency(total, currency_symbol));

    if !result.skipped.is_empty() {
        println!("  Skipped:     {}", result.skipped.len());
        for row in &result.skipped {
            println!("    Line {}: {}", row.line, row.reason);
        }
    }

    Ok(())
}
