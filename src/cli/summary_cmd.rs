use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::cli::renderer;
use crate::cli::{OutputFormat, OutputOptions};
use crate::core::config::AppConfig;
use crate::core::ledger::Ledger;
use crate::core::models::record::DailyUsageRecord;
use crate::core::period::UsagePeriod;

#[derive(Serialize)]
struct SummaryPayload<'a> {
    month: String,
    currency: &'a str,
    days: &'a [DailyUsageRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    total_cost: Option<f64>,
}

pub fn run(
    year: Option<i32>,
    month: Option<u32>,
    show_all: bool,
    opts: &OutputOptions,
) -> Result<()> {
    let config = AppConfig::load().unwrap_or_default();
    let period = UsagePeriod::resolve(year, month)?;
    let ledger = Ledger::open(Path::new(&config.ledger.dir), &period);
    report(&ledger, &period, &config, show_all, opts)
}

/// Report the month's ledger: the summed total, optionally the per-day
/// table. A missing ledger file is "no data", not an error.
pub fn report(
    ledger: &Ledger,
    period: &UsagePeriod,
    config: &AppConfig,
    show_all: bool,
    opts: &OutputOptions,
) -> Result<()> {
    let records = ledger.read_records()?;

    match opts.format {
        OutputFormat::Json => {
            let payload = SummaryPayload {
                month: period.label(),
                currency: &config.rates.currency,
                days: records.as_deref().unwrap_or(&[]),
                total_cost: records
                    .as_ref()
                    .map(|rows| rows.iter().map(|r| r.total_cost).sum()),
            };
            let json = if opts.pretty {
                serde_json::to_string_pretty(&payload)?
            } else {
                serde_json::to_string(&payload)?
            };
            println!("{}", json);
        }
        OutputFormat::Text => match records {
            None => println!("{}", renderer::render_no_data_line(&period.label())),
            Some(records) => {
                if show_all {
                    println!("{}\n", renderer::render_month_table(&records, opts.use_color));
                }
                let total: f64 = records.iter().map(|r| r.total_cost).sum();
                println!(
                    "{}",
                    renderer::render_total_line(
                        &period.label(),
                        total,
                        &config.rates.currency,
                        opts.use_color,
                    )
                );
            }
        },
    }

    Ok(())
}
