use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;

use crate::cli::{summary_cmd, OutputOptions};
use crate::core::auth;
use crate::core::builder;
use crate::core::config::AppConfig;
use crate::core::ledger::Ledger;
use crate::core::openai;
use crate::core::period::UsagePeriod;

/// Build the month's ledger, then report it.
pub async fn run(year: Option<i32>, month: Option<u32>, opts: &OutputOptions) -> Result<()> {
    let config = AppConfig::load().unwrap_or_default();
    let period = UsagePeriod::resolve(year, month)?;
    let creds = auth::read_openai_credentials()?;
    let rates = config.rates.cost_rates();
    let delay = Duration::from_millis(config.ledger.request_delay_ms);
    let today = Local::now().date_naive();

    let ledger = Ledger::create(Path::new(&config.ledger.dir), &period)?;
    let client = reqwest::Client::new();

    let outcome = builder::build_month(&ledger, &period, today, &rates, delay, |date| {
        let client = client.clone();
        let creds = creds.clone();
        async move { openai::fetch_daily_usage(&client, &creds, date).await }
    })
    .await?;

    if opts.verbose {
        eprintln!(
            "{}: {} day(s) written, {} already recorded",
            period.label(),
            outcome.written,
            outcome.skipped
        );
    }

    summary_cmd::report(&ledger, &period, &config, false, opts)
}
