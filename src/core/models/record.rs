use chrono::NaiveDate;
use serde::Serialize;

use crate::core::models::rates::CostRates;
use crate::core::openai::DailyUsage;

/// One ledger row: a single day's request/token counts and their cost.
#[derive(Debug, Clone, Serialize)]
pub struct DailyUsageRecord {
    pub date: NaiveDate,
    pub total_requests: u64,
    pub total_context_tokens: u64,
    pub total_generated_tokens: u64,
    pub input_token_cost: f64,
    pub output_token_cost: f64,
    pub total_cost: f64,
}

impl DailyUsageRecord {
    /// Reduce a day's usage payload to a cost row.
    ///
    /// Sums the counters across all line items and prices the two token
    /// totals with the run's rates. An absent payload means no usage was
    /// reported for the day; every field is zero.
    pub fn reduce(date: NaiveDate, usage: Option<&DailyUsage>, rates: &CostRates) -> Self {
        let Some(usage) = usage else {
            return Self::zero(date);
        };

        let total_requests = usage.data.iter().map(|item| item.n_requests).sum();
        let total_context_tokens: u64 = usage
            .data
            .iter()
            .map(|item| item.n_context_tokens_total)
            .sum();
        let total_generated_tokens: u64 = usage
            .data
            .iter()
            .map(|item| item.n_generated_tokens_total)
            .sum();

        let input_token_cost = total_context_tokens as f64 * rates.input_per_token;
        let output_token_cost = total_generated_tokens as f64 * rates.output_per_token;

        Self {
            date,
            total_requests,
            total_context_tokens,
            total_generated_tokens,
            input_token_cost,
            output_token_cost,
            total_cost: input_token_cost + output_token_cost,
        }
    }

    /// The row recorded for a day with no usage data.
    pub fn zero(date: NaiveDate) -> Self {
        Self {
            date,
            total_requests: 0,
            total_context_tokens: 0,
            total_generated_tokens: 0,
            input_token_cost: 0.0,
            output_token_cost: 0.0,
            total_cost: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::openai::UsageLineItem;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn rates() -> CostRates {
        CostRates::from_usd_per_million(10.0, 30.0, 33.0)
    }

    fn line(requests: u64, context: u64, generated: u64) -> UsageLineItem {
        UsageLineItem {
            n_requests: requests,
            n_context_tokens_total: context,
            n_generated_tokens_total: generated,
        }
    }

    #[test]
    fn reduce_sums_line_items_and_prices_tokens() {
        let usage = DailyUsage {
            data: vec![line(3, 100, 10), line(5, 200, 20)],
        };
        let record = DailyUsageRecord::reduce(date(), Some(&usage), &rates());

        assert_eq!(record.total_requests, 8);
        assert_eq!(record.total_context_tokens, 300);
        assert_eq!(record.total_generated_tokens, 30);
        assert!((record.input_token_cost - 0.099).abs() < 1e-9);
        assert!((record.output_token_cost - 0.0297).abs() < 1e-9);
        assert!((record.total_cost - 0.1287).abs() < 1e-9);
    }

    #[test]
    fn reduce_absent_payload_is_all_zero() {
        let record = DailyUsageRecord::reduce(date(), None, &rates());
        assert_eq!(record.total_requests, 0);
        assert_eq!(record.total_context_tokens, 0);
        assert_eq!(record.total_generated_tokens, 0);
        assert_eq!(record.total_cost, 0.0);
    }

    #[test]
    fn reduce_empty_line_items_is_all_zero() {
        let usage = DailyUsage { data: vec![] };
        let record = DailyUsageRecord::reduce(date(), Some(&usage), &rates());
        assert_eq!(record.total_requests, 0);
        assert_eq!(record.total_cost, 0.0);
    }

    #[test]
    fn reduce_single_line_item() {
        let usage = DailyUsage {
            data: vec![line(1, 1_000_000, 0)],
        };
        let record = DailyUsageRecord::reduce(date(), Some(&usage), &rates());
        assert_eq!(record.total_requests, 1);
        // 1M context tokens at 10 USD/M * 33 = 330 in target currency
        assert!((record.input_token_cost - 330.0).abs() < 1e-6);
        assert_eq!(record.output_token_cost, 0.0);
        assert!((record.total_cost - 330.0).abs() < 1e-6);
    }
}
