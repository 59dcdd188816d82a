use serde::{Deserialize, Serialize};

/// Body of `POST /activate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRequest {
    pub mint: String,
    pub name: String,
    pub price_usd: Option<String>,
    pub market_cap: Option<f64>,
    pub logo_url: Option<String>,
    pub dex_url: Option<String>,
    pub network: String,
}
