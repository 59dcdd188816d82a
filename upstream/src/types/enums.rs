use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// Chains a customer can pay on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Network {
    Sol,
    Eth,
    Bsc,
    Base,
    Sui,
    Xrp,
}

impl Network {
    /// Every supported network, in menu order.
    pub const ALL: [Network; 6] = [
        Network::Sol,
        Network::Eth,
        Network::Bsc,
        Network::Sui,
        Network::Base,
        Network::Xrp,
    ];

    /// Ticker-style symbol used in menus, config keys and action tokens.
    pub fn symbol(self) -> &'static str {
        match self {
            Network::Sol => "SOL",
            Network::Eth => "ETH",
            Network::Bsc => "BSC",
            Network::Base => "BASE",
            Network::Sui => "SUI",
            Network::Xrp => "XRP",
        }
    }

    /// Asset id at the price source.
    ///
    /// BASE settles in ETH, so both price off `ethereum`.
    pub fn price_asset_id(self) -> &'static str {
        match self {
            Network::Sol => "solana",
            Network::Eth | Network::Base => "ethereum",
            Network::Bsc => "binancecoin",
            Network::Sui => "sui",
            Network::Xrp => "ripple",
        }
    }

    /// Native currency ticker the payable amount is denominated in.
    pub fn native_unit(self) -> &'static str {
        match self {
            Network::Sol => "SOL",
            Network::Eth | Network::Base => "ETH",
            Network::Bsc => "BNB",
            Network::Sui => "SUI",
            Network::Xrp => "XRP",
        }
    }

    /// EVM chains share address and hash formats.
    pub fn is_evm(self) -> bool {
        matches!(self, Network::Eth | Network::Bsc | Network::Base)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Network {
    type Err = UpstreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SOL" => Ok(Network::Sol),
            "ETH" => Ok(Network::Eth),
            "BSC" => Ok(Network::Bsc),
            "BASE" => Ok(Network::Base),
            "SUI" => Ok(Network::Sui),
            "XRP" => Ok(Network::Xrp),
            other => Err(UpstreamError::Validation(format!(
                "unsupported network: {other}"
            ))),
        }
    }
}

/// Confirmation state of a payment transaction.
///
/// Anything short of an explicit confirmation is `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxStatus {
    Confirmed,
    Pending,
}

impl TxStatus {
    pub fn is_confirmed(self) -> bool {
        self == TxStatus::Confirmed
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStatus::Confirmed => f.write_str("CONFIRMED"),
            TxStatus::Pending => f.write_str("PENDING"),
        }
    }
}
