use std::time::Duration;

/// Public Solana RPC used when no Helius key is configured.
pub const PUBLIC_SOLANA_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Endpoints and timeouts for every external service the bot talks to.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Token pair aggregator (e.g. `https://api.dexscreener.com`).
    pub dex_url: String,
    /// Spot price source (e.g. `https://api.coingecko.com/api/v3`).
    pub price_url: String,
    /// Solana JSON-RPC endpoint used for signature status.
    pub rpc_url: String,
    /// Base URL of the activation webhook; `/activate` is appended.
    pub activation_url: String,
    /// Timeout for lookups, quotes and status checks.
    pub request_timeout: Duration,
    /// Timeout for the activation call.
    pub activation_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            dex_url: "https://api.dexscreener.com".into(),
            price_url: "https://api.coingecko.com/api/v3".into(),
            rpc_url: PUBLIC_SOLANA_RPC_URL.into(),
            activation_url: String::new(),
            request_timeout: Duration::from_secs(15),
            activation_timeout: Duration::from_secs(10),
        }
    }
}

/// Helius mainnet RPC URL for the given API key.
pub fn helius_rpc_url(api_key: &str) -> String {
    format!("https://mainnet.helius-rpc.com/?api-key={api_key}")
}
