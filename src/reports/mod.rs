//! Reports module for the finance dashboard
//!
//! Provides the dashboard aggregation: period totals, the monthly
//! revenue/expense series and the revenue breakdown by category.

pub mod dashboard;

pub use dashboard::{
    aggregate, filter_transactions, CategoryTotal, DashboardSummary, MonthTotals,
};
