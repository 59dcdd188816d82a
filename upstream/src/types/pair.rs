use serde::{Deserialize, Serialize};

/// Response of `GET /latest/dex/tokens/{address}`.
///
/// `pairs` is `null` when the aggregator knows no market for the address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexTokenResponse {
    #[serde(default)]
    pub schema_version: Option<String>,
    #[serde(default)]
    pub pairs: Option<Vec<DexPair>>,
}

/// A single trading pair as reported by the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPair {
    #[serde(default)]
    pub chain_id: Option<String>,
    #[serde(default)]
    pub dex_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub pair_address: Option<String>,
    pub base_token: PairToken,
    #[serde(default)]
    pub quote_token: Option<PairToken>,
    #[serde(default)]
    pub price_native: Option<String>,
    #[serde(default)]
    pub price_usd: Option<String>,
    #[serde(default)]
    pub liquidity: Option<PairLiquidity>,
    #[serde(default)]
    pub fdv: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub info: Option<PairInfo>,
}

impl DexPair {
    /// USD liquidity, with a missing figure counted as zero.
    pub fn liquidity_usd(&self) -> f64 {
        self.liquidity
            .as_ref()
            .and_then(|l| l.usd)
            .unwrap_or(0.0)
    }

    /// First social link of the given type (`telegram`, `twitter`).
    pub fn social(&self, kind: &str) -> Option<&str> {
        self.info
            .as_ref()?
            .socials
            .iter()
            .find(|s| s.kind.eq_ignore_ascii_case(kind))
            .map(|s| s.url.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairToken {
    #[serde(default)]
    pub address: Option<String>,
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairLiquidity {
    #[serde(default)]
    pub usd: Option<f64>,
    #[serde(default)]
    pub base: Option<f64>,
    #[serde(default)]
    pub quote: Option<f64>,
}

/// Optional pair metadata: artwork and links.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairInfo {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub websites: Vec<PairWebsite>,
    #[serde(default)]
    pub socials: Vec<PairSocial>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairWebsite {
    #[serde(default)]
    pub label: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSocial {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}
