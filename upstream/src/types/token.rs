use serde::{Deserialize, Serialize};

/// Canonical token metadata taken from its deepest pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub address: String,
    pub name: String,
    pub symbol: String,
    /// Price exactly as the aggregator formats it.
    pub price_usd: Option<String>,
    pub liquidity_usd: Option<f64>,
    /// Fully diluted valuation.
    pub market_cap_usd: Option<f64>,
    pub pair_url: Option<String>,
    pub logo_url: Option<String>,
    pub telegram_link: Option<String>,
    pub twitter_link: Option<String>,
}
