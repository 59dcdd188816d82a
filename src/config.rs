//! Bot configuration, read from the environment (and `.env`).

use upstream::config::helius_rpc_url;
use upstream::{Network, UpstreamConfig};

use crate::catalog::WalletTable;
use crate::error::ConfigError;

/// Everything the funnel needs besides the upstream clients.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// The only identity allowed to approve activations.
    pub admin_id: i64,
    /// Public channel that receives activation broadcasts.
    pub channel: String,
    /// Receiving address per network.
    pub wallets: WalletTable,
    /// Consult the chain before admitting a TXID instead of after.
    pub require_confirmed: bool,
    /// External service endpoints and timeouts.
    pub upstream: UpstreamConfig,
}

impl BotConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let admin_raw = required("ADMIN_ID")?;
        let admin_id = admin_raw
            .trim()
            .parse::<i64>()
            .map_err(|e| ConfigError::Invalid {
                name: "ADMIN_ID",
                reason: e.to_string(),
            })?;

        let channel = required("CHANNEL_USERNAME")?;

        let wallets = WalletTable::new(Network::ALL.into_iter().filter_map(|n| {
            lookup(&format!("{}_WALLET", n.symbol())).map(|addr| (n, addr.trim().to_string()))
        }))
        .map_err(ConfigError::MissingWallet)?;

        let mut upstream = upstream_from_lookup(&lookup);
        upstream.activation_url = required("ACTIVATION_URL")?;

        Ok(Self {
            admin_id,
            channel,
            wallets,
            require_confirmed: false,
            upstream,
        })
    }
}

/// Upstream endpoints with any environment overrides applied.
///
/// Enough for the read-only diagnostic commands; `ACTIVATION_URL` is
/// picked up if set but not required.
pub fn upstream_from_env() -> UpstreamConfig {
    upstream_from_lookup(&|key: &str| std::env::var(key).ok())
}

fn upstream_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> UpstreamConfig {
    let mut upstream = UpstreamConfig::default();
    if let Some(key) = lookup("HELIUS_API_KEY").filter(|k| !k.is_empty()) {
        upstream.rpc_url = helius_rpc_url(&key);
    }
    if let Some(url) = lookup("DEX_API_URL") {
        upstream.dex_url = url;
    }
    if let Some(url) = lookup("PRICE_API_URL") {
        upstream.price_url = url;
    }
    if let Some(url) = lookup("ACTIVATION_URL") {
        upstream.activation_url = url;
    }
    upstream
}
