//! Token metadata lookup against the pair aggregator.
//!
//! An address can trade in many pools; the one with the deepest USD
//! liquidity is taken as canonical.

use std::time::Duration;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::error::{Result, UpstreamError};
use crate::rest::UpstreamHttpClient;
use crate::types::{DexPair, DexTokenResponse, TokenInfo};

/// Resolves a token address to [`TokenInfo`].
#[derive(Debug, Clone)]
pub struct DexResolver {
    http: UpstreamHttpClient,
}

impl DexResolver {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: UpstreamHttpClient::new(base_url, timeout)?,
        })
    }

    /// GET /latest/dex/tokens/{address} and pick the deepest pair.
    ///
    /// # Errors
    ///
    /// [`UpstreamError::TokenNotFound`] when no pair exists; any other
    /// variant means the lookup itself failed.
    pub async fn resolve(&self, address: &str) -> Result<TokenInfo> {
        let resp: DexTokenResponse = self
            .http
            .get_segments(&["latest", "dex", "tokens", address], &[])
            .await?;

        let pairs = resp.pairs.unwrap_or_default();
        debug!(address, pairs = pairs.len(), "pairs fetched");

        let pair = select_deepest_pair(&pairs)
            .ok_or_else(|| UpstreamError::TokenNotFound(address.to_string()))?;

        Ok(token_info_from_pair(address, pair))
    }
}

/// The pair with the highest USD liquidity; missing liquidity counts as zero.
pub fn select_deepest_pair(pairs: &[DexPair]) -> Option<&DexPair> {
    pairs.iter().max_by_key(|p| OrderedFloat(p.liquidity_usd()))
}

/// Flatten a pair into the metadata the funnel keeps.
pub fn token_info_from_pair(address: &str, pair: &DexPair) -> TokenInfo {
    TokenInfo {
        address: address.to_string(),
        name: pair.base_token.name.clone(),
        symbol: pair.base_token.symbol.clone(),
        price_usd: pair.price_usd.clone(),
        liquidity_usd: pair.liquidity.as_ref().and_then(|l| l.usd),
        market_cap_usd: pair.fdv,
        pair_url: pair.url.clone(),
        logo_url: pair.info.as_ref().and_then(|i| i.image_url.clone()),
        telegram_link: pair.social("telegram").map(str::to_string),
        twitter_link: pair.social("twitter").map(str::to_string),
    }
}
