//! Payloads waiting for one-time admin approval.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;
use upstream::{ActivationRequest, Network, TokenInfo, TxStatus};

use crate::error::FunnelError;
use crate::session::UserId;

/// Trailing txid characters used in a reference.
const REFERENCE_TAIL: usize = 8;

/// Frozen copy of a finished session, captured at payment submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingActivation {
    pub user_id: UserId,
    pub network: Network,
    pub token: TokenInfo,
    pub package_label: &'static str,
    pub usd_price: Decimal,
    pub payable_amount: Decimal,
    pub txid: String,
    /// Chain status seen at submission; advisory only.
    pub chain_status: TxStatus,
    pub submitted_at: DateTime<Utc>,
}

impl PendingActivation {
    /// Body for the external activation call.
    pub fn activation_request(&self) -> ActivationRequest {
        ActivationRequest {
            mint: self.token.address.clone(),
            name: self.token.name.clone(),
            price_usd: self.token.price_usd.clone(),
            market_cap: self.token.market_cap_usd,
            logo_url: self.token.logo_url.clone(),
            dex_url: self.token.pair_url.clone(),
            network: self.network.symbol().to_string(),
        }
    }
}

/// Short reference for `(user, txid)`: `"{user}_{last 8 chars of txid}"`.
pub fn reference_for(user: UserId, txid: &str) -> String {
    reference_with_tail(user, txid, REFERENCE_TAIL)
}

fn reference_with_tail(user: UserId, txid: &str, tail: usize) -> String {
    let skip = txid.chars().count().saturating_sub(tail);
    let suffix: String = txid.chars().skip(skip).collect();
    format!("{user}_{suffix}")
}

/// Pending table: reference -> payload, each consumable once.
#[derive(Debug, Default)]
pub struct ActivationRelay {
    pending: Mutex<HashMap<String, PendingActivation>>,
}

impl ActivationRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `activation` and return the reference it is filed under.
    ///
    /// Two txids of one user can share a tail; the reference then widens
    /// up to the full txid. If even that is taken (one id is a suffix of
    /// another) a counter is appended. A staged activation is never
    /// overwritten.
    pub fn stage(&self, activation: PendingActivation) -> String {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        let user = activation.user_id;
        let txid = activation.txid.clone();
        let full = txid.chars().count();

        let mut reference = reference_for(user, &txid);
        let mut tail = REFERENCE_TAIL;
        let mut n = 1u32;
        loop {
            match pending.entry(reference) {
                Entry::Vacant(slot) => {
                    let reference = slot.key().clone();
                    slot.insert(activation);
                    debug!(reference = %reference, "activation staged");
                    return reference;
                }
                Entry::Occupied(_) if tail < full => {
                    tail *= 2;
                    reference = reference_with_tail(user, &txid, tail);
                }
                Entry::Occupied(_) => {
                    n += 1;
                    reference = format!("{user}_{txid}_{n}");
                }
            }
        }
    }

    /// Take the payload for `reference`; a second call finds nothing.
    pub fn consume(&self, reference: &str) -> Result<PendingActivation, FunnelError> {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(reference)
            .ok_or_else(|| FunnelError::MissingReference(reference.to_string()))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn activation(user: UserId, txid: &str) -> PendingActivation {
        PendingActivation {
            user_id: user,
            network: Network::Sol,
            token: TokenInfo {
                address: "mint".into(),
                name: "Bonk".into(),
                symbol: "BONK".into(),
                price_usd: Some("0.00002".into()),
                liquidity_usd: None,
                market_cap_usd: Some(5_000.0),
                pair_url: Some("https://dexscreener.com/solana/pair".into()),
                logo_url: None,
                telegram_link: None,
                twitter_link: None,
            },
            package_label: "24H",
            usd_price: dec!(2500),
            payable_amount: dec!(25.5),
            txid: txid.into(),
            chain_status: TxStatus::Pending,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_reference_uses_txid_tail() {
        assert_eq!(reference_for(42, "abc123"), "42_abc123");
        assert_eq!(reference_for(42, "0123456789abcdef"), "42_89abcdef");
    }

    #[test]
    fn test_consume_is_one_shot() {
        let relay = ActivationRelay::new();
        let reference = relay.stage(activation(42, "abc123"));
        assert_eq!(reference, reference_for(42, "abc123"));

        let payload = relay.consume(&reference).unwrap();
        assert_eq!(payload.txid, "abc123");
        assert!(matches!(
            relay.consume(&reference),
            Err(FunnelError::MissingReference(_))
        ));
        assert_eq!(relay.pending_count(), 0);
    }

    #[test]
    fn test_shared_tail_widens_reference() {
        let relay = ActivationRelay::new();
        let first = relay.stage(activation(1, "aaaaaaaa-12345678"));
        let second = relay.stage(activation(1, "bbbbbbbb-12345678"));
        assert_eq!(first, "1_12345678");
        assert_ne!(first, second);
        assert_eq!(relay.consume(&second).unwrap().txid, "bbbbbbbb-12345678");
        assert_eq!(relay.consume(&first).unwrap().txid, "aaaaaaaa-12345678");
    }

    #[test]
    fn test_txid_that_is_a_suffix_keeps_both() {
        let relay = ActivationRelay::new();
        let first = relay.stage(activation(1, "aaaaaaaa12345678"));
        let second = relay.stage(activation(1, "12345678"));
        assert_eq!(first, "1_12345678");
        assert_eq!(second, "1_12345678_2");
        assert_eq!(relay.pending_count(), 2);

        let third = relay.stage(activation(1, "bbbbbbbb12345678"));
        assert_eq!(third, "1_bbbbbbbb12345678");
        assert_eq!(relay.pending_count(), 3);

        assert_eq!(relay.consume(&first).unwrap().txid, "aaaaaaaa12345678");
        assert_eq!(relay.consume(&second).unwrap().txid, "12345678");
        assert_eq!(relay.consume(&third).unwrap().txid, "bbbbbbbb12345678");
    }

    #[test]
    fn test_activation_request_fields() {
        let req = activation(1, "abc").activation_request();
        assert_eq!(req.mint, "mint");
        assert_eq!(req.network, "SOL");
        assert_eq!(req.market_cap, Some(5_000.0));
        assert_eq!(req.dex_url.as_deref(), Some("https://dexscreener.com/solana/pair"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_consume_single_winner() {
        let relay = Arc::new(ActivationRelay::new());
        let reference = relay.stage(activation(9, "abc123"));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let relay = Arc::clone(&relay);
                let reference = reference.clone();
                tokio::spawn(async move { relay.consume(&reference).is_ok() })
            })
            .collect();

        let results = futures_util::future::join_all(handles).await;
        assert_eq!(results.into_iter().filter(|r| *r.as_ref().unwrap()).count(), 1);
    }
}
