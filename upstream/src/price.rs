//! USD spot price per network from the price source.

use std::time::Duration;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{Result, UpstreamError};
use crate::rest::UpstreamHttpClient;
use crate::types::{Network, SimplePriceResponse};

/// Quotes the USD price of one native unit of a network.
#[derive(Debug, Clone)]
pub struct PriceOracle {
    http: UpstreamHttpClient,
}

impl PriceOracle {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: UpstreamHttpClient::new(base_url, timeout)?,
        })
    }

    /// GET /simple/price for the network's asset id.
    ///
    /// # Errors
    ///
    /// [`UpstreamError::PriceUnavailable`] when the asset is missing or the
    /// price is not a positive number; transport and decode errors pass
    /// through. Callers treat all of them as "unavailable".
    pub async fn quote(&self, network: Network) -> Result<Decimal> {
        let asset = network.price_asset_id();
        let resp: SimplePriceResponse = self
            .http
            .get(
                "/simple/price",
                &[("ids", asset), ("vs_currencies", "usd")],
            )
            .await?;

        let price = extract_usd_price(&resp, asset)?;
        debug!(%network, asset, %price, "price quoted");
        Ok(price)
    }
}

/// Pull `resp[asset].usd` out as a positive decimal.
pub fn extract_usd_price(resp: &SimplePriceResponse, asset: &str) -> Result<Decimal> {
    let raw = resp
        .get(asset)
        .and_then(|m| m.get("usd"))
        .copied()
        .ok_or_else(|| UpstreamError::PriceUnavailable(format!("no usd price for {asset}")))?;

    let price = Decimal::from_f64(raw)
        .ok_or_else(|| UpstreamError::PriceUnavailable(format!("unrepresentable price {raw}")))?;

    if price <= Decimal::ZERO {
        return Err(UpstreamError::PriceUnavailable(format!(
            "non-positive price {price} for {asset}"
        )));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn resp(asset: &str, usd: f64) -> SimplePriceResponse {
        let mut inner = HashMap::new();
        inner.insert("usd".to_string(), usd);
        let mut outer = HashMap::new();
        outer.insert(asset.to_string(), inner);
        outer
    }

    #[test]
    fn test_extract_price() {
        let r = resp("solana", 172.5);
        assert_eq!(extract_usd_price(&r, "solana").unwrap(), dec!(172.5));
    }

    #[test]
    fn test_missing_asset_is_unavailable() {
        let r = SimplePriceResponse::new();
        assert!(matches!(
            extract_usd_price(&r, "solana"),
            Err(UpstreamError::PriceUnavailable(_))
        ));
    }

    #[test]
    fn test_zero_price_is_unavailable() {
        let r = resp("ripple", 0.0);
        assert!(extract_usd_price(&r, "ripple").is_err());
    }
}
