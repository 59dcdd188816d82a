//! Inbound events, parsed from the transport's raw form.

use std::fmt;
use std::str::FromStr;

use upstream::Network;

use crate::catalog::{find_package, Package};
use crate::error::FunnelError;

/// One event from a user.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// The start command.
    Start,
    /// A menu button press.
    Action(Action),
    /// Free text; its meaning depends on the session step.
    Text(String),
}

/// Menu actions. Rendered as and parsed from opaque callback tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `START`: open the network menu.
    Begin,
    /// `NET_<SYM>`
    SelectNetwork(Network),
    /// `PKG_<LABEL>`
    SelectPackage(&'static Package),
    /// `BACK_NET`: from the package menu back to the network menu.
    BackToNetworks,
    /// `BACK_PKG`: from the payment summary back to the package menu.
    BackToPackages,
    /// `CONFIRM`: accept the quote and reveal the wallet.
    Confirm,
    /// `PAID`: the user says they sent the funds.
    Paid,
    /// `ADMIN_START_<ref>`
    AdminApprove(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Begin => f.write_str("START"),
            Action::SelectNetwork(n) => write!(f, "NET_{}", n.symbol()),
            Action::SelectPackage(p) => write!(f, "PKG_{}", p.label),
            Action::BackToNetworks => f.write_str("BACK_NET"),
            Action::BackToPackages => f.write_str("BACK_PKG"),
            Action::Confirm => f.write_str("CONFIRM"),
            Action::Paid => f.write_str("PAID"),
            Action::AdminApprove(r) => write!(f, "ADMIN_START_{r}"),
        }
    }
}

impl FromStr for Action {
    type Err = FunnelError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let unexpected = || FunnelError::UnexpectedInput(format!("unknown action token {token:?}"));

        match token {
            "START" => return Ok(Action::Begin),
            "BACK_NET" => return Ok(Action::BackToNetworks),
            "BACK_PKG" => return Ok(Action::BackToPackages),
            "CONFIRM" => return Ok(Action::Confirm),
            "PAID" => return Ok(Action::Paid),
            _ => {}
        }

        if let Some(sym) = token.strip_prefix("NET_") {
            let network = Network::ALL
                .into_iter()
                .find(|n| n.symbol() == sym)
                .ok_or_else(unexpected)?;
            return Ok(Action::SelectNetwork(network));
        }
        if let Some(label) = token.strip_prefix("PKG_") {
            let package = find_package(label).ok_or_else(|| FunnelError::UnknownPackage(label.to_string()))?;
            return Ok(Action::SelectPackage(package));
        }
        if let Some(reference) = token.strip_prefix("ADMIN_START_") {
            if reference.is_empty() {
                return Err(unexpected());
            }
            return Ok(Action::AdminApprove(reference.to_string()));
        }
        Err(unexpected())
    }
}
