use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::auth::OpenAiCredentials;

const USAGE_URL: &str = "https://api.openai.com/v1/usage";

/// One line item of the usage endpoint's `data` array. The endpoint
/// reports more fields (snapshot id, operation, …); only the counters the
/// ledger needs are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageLineItem {
    #[serde(default)]
    pub n_requests: u64,
    #[serde(default)]
    pub n_context_tokens_total: u64,
    #[serde(default)]
    pub n_generated_tokens_total: u64,
}

/// Success payload of `GET /v1/usage?date=YYYY-MM-DD`.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyUsage {
    #[serde(default)]
    pub data: Vec<UsageLineItem>,
}

/// Fetch one day's usage counts.
///
/// A transport error or non-success status is "no usage that day": the
/// batch run must reach the end of the month even when single days fail,
/// so those are logged and absorbed, never returned as errors. A success
/// response that fails to deserialize does abort the run.
pub async fn fetch_daily_usage(
    client: &reqwest::Client,
    creds: &OpenAiCredentials,
    date: NaiveDate,
) -> Result<Option<DailyUsage>> {
    let response = match client
        .get(USAGE_URL)
        .query(&[("date", date.format("%Y-%m-%d").to_string())])
        .header("Authorization", format!("Bearer {}", creds.api_key))
        .header("OpenAI-Organization", &creds.organization)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(%date, error = %e, "usage request failed, recording zero usage");
            return Ok(None);
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(
            %date,
            status = status.as_u16(),
            "usage endpoint returned non-success, recording zero usage"
        );
        return Ok(None);
    }

    let usage: DailyUsage = response
        .json()
        .await
        .with_context(|| format!("Failed to parse usage response for {}", date))?;
    Ok(Some(usage))
}
