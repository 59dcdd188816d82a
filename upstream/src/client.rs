use crate::activation::ActivationClient;
use crate::chain::PaymentVerifier;
use crate::config::UpstreamConfig;
use crate::dex::DexResolver;
use crate::error::Result;
use crate::price::PriceOracle;

/// Every external collaborator of the funnel, built from one config.
#[derive(Debug, Clone)]
pub struct Upstream {
    pub dex: DexResolver,
    pub prices: PriceOracle,
    pub chain: PaymentVerifier,
    pub activation: ActivationClient,
}

impl Upstream {
    /// Build all clients. Fails only on malformed URLs or TLS setup.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            dex: DexResolver::new(&config.dex_url, config.request_timeout)?,
            prices: PriceOracle::new(&config.price_url, config.request_timeout)?,
            chain: PaymentVerifier::new(&config.rpc_url, config.request_timeout)?,
            activation: ActivationClient::new(&config.activation_url, config.activation_timeout)?,
        })
    }
}
