//! Finance Dashboard - income and expense tracking
//!
//! This library provides the core functionality for a small revenue/expense
//! dashboard: recording transactions by hand, bulk-importing pt-BR bank
//! exports from CSV, and aggregating them into period totals, a monthly
//! series and a revenue breakdown by category.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transaction, type, period filter)
//! - `storage`: Per-user JSON file storage
//! - `audit`: Audit logging of created transactions
//! - `services`: Transaction creation and CSV import
//! - `reports`: Dashboard aggregation
//! - `display`: Terminal formatting (pt-BR currency and month labels)
//! - `cli`: Command handlers for the `dashboard` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use finance_dashboard::models::{PeriodFilter, TransactionType};
//! use finance_dashboard::reports::aggregate;
//! use finance_dashboard::services::parse_csv;
//!
//! let txns = parse_csv(&text, TransactionType::Revenue)?;
//! let summary = aggregate(&txns, PeriodFilter::ThisYear, chrono::Local::now().naive_local());
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{DashboardError, ImportError};
