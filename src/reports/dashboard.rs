//! Dashboard Report
//!
//! Aggregates a list of transactions into the dashboard KPIs: period totals,
//! a 12-month revenue/expense series for the reference year, and revenue by
//! category. Pure computation over in-memory data.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use crate::models::{PeriodFilter, Transaction, TransactionType};

/// Running sum with Neumaier compensation
#[derive(Debug, Clone, Copy, Default)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn add(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }

    fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Revenue and expense for one calendar month
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthTotals {
    pub revenue: f64,
    pub expense: f64,
}

/// Revenue summed for one category label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub revenue: f64,
}

/// Aggregated dashboard figures
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Filter the figures were computed for
    pub filter: PeriodFilter,
    /// Year the monthly series covers
    pub reference_year: i32,
    pub total_revenue: f64,
    pub total_expense: f64,
    /// Always `total_revenue - total_expense`
    pub balance: f64,
    /// Indexed by month, January = 0
    pub monthly: [MonthTotals; 12],
    /// Revenue per category, in order of first appearance
    pub categories: Vec<CategoryTotal>,
    /// Transactions that passed the filter, in input order
    pub transactions: Vec<Transaction>,
}

impl DashboardSummary {
    /// Aggregate `transactions` for `filter`, relative to `now`
    pub fn generate(transactions: &[Transaction], filter: PeriodFilter, now: NaiveDateTime) -> Self {
        let reference_year = now.year();
        let filtered = filter_transactions(transactions, filter, now);

        let mut revenue = CompensatedSum::default();
        let mut expense = CompensatedSum::default();
        let mut monthly = [(CompensatedSum::default(), CompensatedSum::default()); 12];
        let mut category_sums: Vec<(String, CompensatedSum)> = Vec::new();
        let mut category_index: HashMap<String, usize> = HashMap::new();

        for txn in &filtered {
            // Filtered records always carry a date
            let Some(date) = txn.date else { continue };

            let in_reference_year = date.year() == reference_year;
            let month = date.month0() as usize;

            match txn.kind {
                TransactionType::Revenue => {
                    revenue.add(txn.value);
                    if in_reference_year {
                        monthly[month].0.add(txn.value);
                    }

                    let idx = *category_index
                        .entry(txn.category.clone())
                        .or_insert_with(|| {
                            category_sums.push((txn.category.clone(), CompensatedSum::default()));
                            category_sums.len() - 1
                        });
                    category_sums[idx].1.add(txn.value);
                }
                TransactionType::Expense => {
                    expense.add(txn.value);
                    if in_reference_year {
                        monthly[month].1.add(txn.value);
                    }
                }
            }
        }

        let total_revenue = revenue.value();
        let total_expense = expense.value();

        Self {
            filter,
            reference_year,
            total_revenue,
            total_expense,
            balance: total_revenue - total_expense,
            monthly: monthly.map(|(rev, exp)| MonthTotals {
                revenue: rev.value(),
                expense: exp.value(),
            }),
            categories: category_sums
                .into_iter()
                .map(|(category, sum)| CategoryTotal {
                    category,
                    revenue: sum.value(),
                })
                .collect(),
            transactions: filtered,
        }
    }

    /// First `limit` filtered transactions
    pub fn recent(&self, limit: usize) -> &[Transaction] {
        &self.transactions[..limit.min(self.transactions.len())]
    }

    /// Number of transactions that passed the filter
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

/// Aggregate `transactions` for `filter`, relative to `now`
pub fn aggregate(transactions: &[Transaction], filter: PeriodFilter, now: NaiveDateTime) -> DashboardSummary {
    DashboardSummary::generate(transactions, filter, now)
}

/// Keep the dated transactions inside `filter`, preserving order
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: PeriodFilter,
    now: NaiveDateTime,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date.map_or(false, |d| filter.contains(d, now)))
        .cloned()
        .collect()
}
