use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;

use crate::core::ledger::Ledger;
use crate::core::models::rates::CostRates;
use crate::core::models::record::DailyUsageRecord;
use crate::core::openai::DailyUsage;
use crate::core::period::UsagePeriod;

/// What a build run did: days newly written vs. days already recorded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildOutcome {
    pub written: usize,
    pub skipped: usize,
}

/// Fill the month's ledger.
///
/// Strictly sequential: one fetch in flight at a time, `delay` between
/// consecutive calls to respect the endpoint's rate limit. Dates already in
/// the ledger are skipped (membership is checked against a set loaded once
/// up front), so replaying a month only fills gaps. A fetch that yields no
/// payload still writes a zero row; the run never stops on a single day.
///
/// Generic over the fetch function so the loop is testable without a
/// network.
pub async fn build_month<F, Fut>(
    ledger: &Ledger,
    period: &UsagePeriod,
    as_of: NaiveDate,
    rates: &CostRates,
    delay: Duration,
    fetch: F,
) -> Result<BuildOutcome>
where
    F: Fn(NaiveDate) -> Fut,
    Fut: Future<Output = Result<Option<DailyUsage>>>,
{
    let existing = ledger.existing_dates()?;
    let mut outcome = BuildOutcome::default();
    let mut first_fetch = true;

    for date in period.days_through(as_of) {
        if existing.contains(&date.format("%Y-%m-%d").to_string()) {
            tracing::debug!(%date, "already recorded, skipping");
            outcome.skipped += 1;
            continue;
        }

        if !first_fetch && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        first_fetch = false;

        let usage = fetch(date).await?;
        let record = DailyUsageRecord::reduce(date, usage.as_ref(), rates);
        ledger.append(&record)?;
        outcome.written += 1;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::openai::UsageLineItem;
    use std::cell::Cell;

    fn rates() -> CostRates {
        CostRates::from_usd_per_million(10.0, 30.0, 33.0)
    }

    fn usage(requests: u64) -> DailyUsage {
        DailyUsage {
            data: vec![UsageLineItem {
                n_requests: requests,
                n_context_tokens_total: 100,
                n_generated_tokens_total: 10,
            }],
        }
    }

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[tokio::test]
    async fn writes_one_row_per_enumerated_date() {
        let dir = tempfile::tempdir().unwrap();
        let period = UsagePeriod::new(2023, 4).unwrap();
        let ledger = Ledger::create(dir.path(), &period).unwrap();

        let outcome = build_month(
            &ledger,
            &period,
            d(2023, 4, 3),
            &rates(),
            Duration::ZERO,
            |_| async { Ok(Some(usage(2))) },
        )
        .await
        .unwrap();

        assert_eq!(outcome, BuildOutcome { written: 3, skipped: 0 });
        assert_eq!(ledger.read_records().unwrap().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn replay_fills_gaps_without_duplicating() {
        let dir = tempfile::tempdir().unwrap();
        let period = UsagePeriod::new(2023, 4).unwrap();
        let ledger = Ledger::create(dir.path(), &period).unwrap();

        let rates = rates();
        let run = |as_of| build_month(&ledger, &period, as_of, &rates, Duration::ZERO, |_| async {
            Ok(Some(usage(1)))
        });

        run(d(2023, 4, 2)).await.unwrap();
        assert_eq!(ledger.read_records().unwrap().unwrap().len(), 2);

        // Same range again: nothing new to write.
        let outcome = run(d(2023, 4, 2)).await.unwrap();
        assert_eq!(outcome, BuildOutcome { written: 0, skipped: 2 });
        assert_eq!(ledger.read_records().unwrap().unwrap().len(), 2);

        // Later in the month: only the gap days are fetched.
        let outcome = run(d(2023, 4, 4)).await.unwrap();
        assert_eq!(outcome, BuildOutcome { written: 2, skipped: 2 });
        assert_eq!(ledger.read_records().unwrap().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn fetcher_not_invoked_for_recorded_dates() {
        let dir = tempfile::tempdir().unwrap();
        let period = UsagePeriod::new(2023, 4).unwrap();
        let ledger = Ledger::create(dir.path(), &period).unwrap();

        build_month(&ledger, &period, d(2023, 4, 2), &rates(), Duration::ZERO, |_| async {
            Ok(Some(usage(1)))
        })
        .await
        .unwrap();

        let calls = Cell::new(0usize);
        build_month(&ledger, &period, d(2023, 4, 3), &rates(), Duration::ZERO, |_| {
            calls.set(calls.get() + 1);
            async { Ok(Some(usage(1))) }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn absent_payload_writes_zero_row() {
        let dir = tempfile::tempdir().unwrap();
        let period = UsagePeriod::new(2023, 4).unwrap();
        let ledger = Ledger::create(dir.path(), &period).unwrap();

        build_month(&ledger, &period, d(2023, 4, 1), &rates(), Duration::ZERO, |_| async {
            Ok(None)
        })
        .await
        .unwrap();

        let records = ledger.read_records().unwrap().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_requests, 0);
        assert_eq!(records[0].total_cost, 0.0);
    }

    #[tokio::test]
    async fn fetch_error_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let period = UsagePeriod::new(2023, 4).unwrap();
        let ledger = Ledger::create(dir.path(), &period).unwrap();

        let result = build_month(&ledger, &period, d(2023, 4, 2), &rates(), Duration::ZERO, |_| async {
            anyhow::bail!("unexpected payload shape")
        })
        .await;

        assert!(result.is_err());
    }
}
