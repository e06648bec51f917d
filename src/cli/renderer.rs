use colored::{control, Colorize};

use crate::core::models::record::DailyUsageRecord;

/// Render the per-day ledger table as a colored (or plain) string.
///
/// Layout:
/// ```text
///  Date         Requests   Context tokens   Generated tokens       Cost
///  2023-04-01          8              300                 30       0.13
///  2023-04-02          0                0                  0       0.00
/// ```
pub fn render_month_table(records: &[DailyUsageRecord], use_color: bool) -> String {
    control::set_override(use_color);

    let header = format!(
        " {:<12} {:>8} {:>16} {:>18} {:>10}",
        "Date", "Requests", "Context tokens", "Generated tokens", "Cost"
    );
    let mut lines: Vec<String> = vec![header.bold().to_string()];

    for record in records {
        lines.push(format!(
            " {:<12} {:>8} {:>16} {:>18} {:>10.2}",
            record.date.format("%Y-%m-%d"),
            format_count(record.total_requests),
            format_count(record.total_context_tokens),
            format_count(record.total_generated_tokens),
            record.total_cost,
        ));
    }

    lines.join("\n")
}

/// The one-line cost report printed at the end of every run.
pub fn render_total_line(label: &str, total: f64, currency: &str, use_color: bool) -> String {
    control::set_override(use_color);
    let amount = format!("{} {:.2}", currency, total);
    format!("Total cost for {}: {}", label, amount.bold())
}

pub fn render_no_data_line(label: &str) -> String {
    format!("No usage data recorded for {}.", label)
}

/// Thousands separators for token counts, e.g. 1234567 -> "1,234,567".
fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.chars().rev().collect()
}
