/// Per-token prices in the ledger currency.
///
/// Derived once per run from USD-per-million base prices and an exchange
/// rate; constant for every day in the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRates {
    pub input_per_token: f64,
    pub output_per_token: f64,
}

impl CostRates {
    /// Convert USD-per-million-token base prices into per-token prices in
    /// the target currency.
    pub fn from_usd_per_million(input_usd: f64, output_usd: f64, exchange_rate: f64) -> Self {
        Self {
            input_per_token: input_usd / 1_000_000.0 * exchange_rate,
            output_per_token: output_usd / 1_000_000.0 * exchange_rate,
        }
    }
}
