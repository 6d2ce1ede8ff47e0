use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use finance_dashboard::cli::{
    handle_add_command, handle_history_command, handle_import_command, handle_list_command,
    handle_summary_command, AddArgs, ImportArgs, ListArgs, SummaryArgs,
};
use finance_dashboard::config::{paths::DashboardPaths, settings::Settings};
use finance_dashboard::storage::Storage;

#[derive(Parser)]
#[command(
    name = "dashboard",
    version,
    about = "Income and expense dashboard with CSV import",
    long_about = "Records revenue and expense transactions, imports pt-BR bank \
                  exports (semicolon-delimited CSV) and shows period totals, a \
                  monthly series and revenue by category."
)]
struct Cli {
    /// User whose records are read and written
    #[arg(short, long, global = true, env = "FINANCE_DASHBOARD_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default settings
    Init,

    /// Record a transaction by hand
    Add(AddArgs),

    /// Import transactions from a CSV file
    Import(ImportArgs),

    /// List transactions, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show dashboard totals, monthly series and category breakdown
    #[command(alias = "dash")]
    Summary(SummaryArgs),

    /// Show recent audit log entries
    History {
        /// Number of entries to show; defaults to the setting
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show current configuration and paths
    Config,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = DashboardPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_logging(&settings.log_level);

    let user_id = cli.user.clone().unwrap_or_else(|| settings.user_id.clone());

    // Initialize storage
    let mut storage = Storage::new(paths.clone(), &user_id)?;
    storage.load_all()?;

    let now = chrono::Local::now().naive_local();

    match cli.command {
        Some(Commands::Init) => {
            if !paths.is_initialized() {
                settings.save(&paths)?;
            }
            println!("Initialized finance dashboard at: {}", paths.base_dir().display());
            println!("Active user: {}", user_id);
            println!();
            println!("Run 'dashboard add --help' to record a transaction.");
            println!("Run 'dashboard import <file.csv>' to import a bank export.");
        }
        Some(Commands::Add(args)) => {
            handle_add_command(&storage, &settings, args, now.date())?;
        }
        Some(Commands::Import(args)) => {
            handle_import_command(&storage, &settings.currency_symbol, args)?;
        }
        Some(Commands::List(args)) => {
            handle_list_command(&storage, &settings, args, now)?;
        }
        Some(Commands::Summary(args)) => {
            handle_summary_command(&storage, &settings, args, now)?;
        }
        Some(Commands::History { limit }) => {
            handle_history_command(&storage, limit.unwrap_or(settings.recent_limit))?;
        }
        Some(Commands::Config) => {
            println!("Finance Dashboard Configuration");
            println!("===============================");
            println!("Base directory:    {}", storage.paths().base_dir().display());
            println!("Settings file:     {}", storage.paths().settings_file().display());
            println!("Transactions file: {}", storage.transactions.path().display());
            println!("Stored entries:    {}", storage.transactions.count()?);
            println!("Audit log:         {}", storage.audit().path().display());
            println!();
            println!("Settings:");
            println!("  User:            {}", user_id);
            println!("  Default period:  {}", settings.default_period.as_str());
            println!("  Currency:        {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Recent entries:  {}", settings.recent_limit);
            println!("  Log level:       {}", settings.log_level);
        }
        None => {
            println!("Finance Dashboard - income and expense tracking");
            println!();
            println!("Run 'dashboard --help' for usage information.");
        }
    }

    Ok(())
}
