//! Fixed price list and the receiving wallets per network.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use upstream::Network;

/// A purchasable trending slot: duration label and its USD price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Package {
    pub label: &'static str,
    pub usd_price: Decimal,
}

/// Every package on offer, shortest first.
pub static PACKAGES: [Package; 7] = [
    Package { label: "24H", usd_price: dec!(2500) },
    Package { label: "48H", usd_price: dec!(5500) },
    Package { label: "72H", usd_price: dec!(8000) },
    Package { label: "96H", usd_price: dec!(10500) },
    Package { label: "120H", usd_price: dec!(13000) },
    Package { label: "144H", usd_price: dec!(15500) },
    Package { label: "168H", usd_price: dec!(18000) },
];

/// Look a package up by its exact label.
pub fn find_package(label: &str) -> Option<&'static Package> {
    PACKAGES.iter().find(|p| p.label == label)
}

/// Receiving address for each network. Complete by construction.
#[derive(Debug, Clone)]
pub struct WalletTable {
    wallets: HashMap<Network, String>,
}

impl WalletTable {
    /// Build from `(network, address)` pairs; `None` names the first
    /// network without an address.
    pub fn new(entries: impl IntoIterator<Item = (Network, String)>) -> Result<Self, Network> {
        let wallets: HashMap<Network, String> = entries
            .into_iter()
            .filter(|(_, addr)| !addr.trim().is_empty())
            .collect();
        if let Some(missing) = Network::ALL.into_iter().find(|n| !wallets.contains_key(n)) {
            return Err(missing);
        }
        Ok(Self { wallets })
    }

    pub fn address(&self, network: Network) -> &str {
        // `new` guarantees every network is present.
        self.wallets.get(&network).map(String::as_str).unwrap_or_default()
    }
}
