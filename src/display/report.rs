//! Report formatting utilities for terminal output
//!
//! Renders the dashboard summary: KPI block, monthly revenue/expense table
//! with bars, category breakdown and the latest entries.

use crate::reports::DashboardSummary;

use super::currency::format_currency;
use super::transaction::format_transaction_register;

/// Short pt-BR month names, January first
pub const MONTH_LABELS_PT_BR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

const REPORT_WIDTH: usize = 72;
const BAR_WIDTH: usize = 20;

/// Options controlling how the dashboard is rendered
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub currency_symbol: &'a str,
    pub date_format: &'a str,
    /// How many of the latest entries to list
    pub recent_limit: usize,
}

/// Localized label for a month index (0 = January)
pub fn month_label(index: usize) -> &'static str {
    MONTH_LABELS_PT_BR.get(index).copied().unwrap_or("?")
}

/// Format the dashboard for terminal display
pub fn format_dashboard(summary: &DashboardSummary, view: &DashboardView<'_>) -> String {
    let money = |v: f64| format_currency(v, view.currency_symbol);
    let mut output = String::new();

    output.push_str(&format_header(
        &format!("Dashboard: {} ({})", summary.filter, summary.reference_year),
        REPORT_WIDTH,
    ));
    output.push('\n');
    output.push_str(&double_separator(REPORT_WIDTH));
    output.push('\n');
    output.push_str(&format!("Total Revenue:  {:>18}\n", money(summary.total_revenue)));
    output.push_str(&format!("Total Expense:  {:>18}\n", money(summary.total_expense)));
    output.push_str(&format!("Balance:        {:>18}\n", money(summary.balance)));
    output.push_str(&format!("Transactions:   {:>18}\n\n", summary.transaction_count()));

    // Monthly series
    output.push_str(&format!("Monthly ({})\n", summary.reference_year));
    output.push_str(&separator(REPORT_WIDTH));
    output.push('\n');

    let max_month = summary
        .monthly
        .iter()
        .flat_map(|m| [m.revenue, m.expense])
        .fold(0.0_f64, f64::max);

    for (idx, month) in summary.monthly.iter().enumerate() {
        output.push_str(&format!(
            "{:<4} {:>16} {} {:>16} {}\n",
            month_label(idx),
            money(month.revenue),
            format_bar(month.revenue, max_month, BAR_WIDTH / 2),
            money(month.expense),
            format_bar(month.expense, max_month, BAR_WIDTH / 2),
        ));
    }
    output.push('\n');

    // Revenue by category
    output.push_str("Revenue by Category\n");
    output.push_str(&separator(REPORT_WIDTH));
    output.push('\n');

    if summary.categories.is_empty() {
        output.push_str("No revenue in this period.\n");
    } else {
        let max_category = summary
            .categories
            .iter()
            .map(|c| c.revenue)
            .fold(0.0_f64, f64::max);

        for category in &summary.categories {
            let pct = if summary.total_revenue > 0.0 {
                category.revenue / summary.total_revenue * 100.0
            } else {
                0.0
            };
            output.push_str(&format!(
                "{:<24} {:>16} {:>6} {}\n",
                truncate(&category.category, 24),
                money(category.revenue),
                format_percentage(pct),
                format_bar(category.revenue, max_category, BAR_WIDTH),
            ));
        }
    }
    output.push('\n');

    // Latest entries
    output.push_str(&format!("Latest {} entries\n", view.recent_limit));
    output.push_str(&format_transaction_register(
        summary.recent(view.recent_limit),
        view.date_format,
        view.currency_symbol,
    ));

    output
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a header line with padding
pub fn format_header(title: &str, width: usize) -> String {
    let len = title.chars().count();
    let padding = if len >= width { 0 } else { (width - len) / 2 };
    format!("{}{}", " ".repeat(padding), title)
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
