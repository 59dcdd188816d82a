//! Per-user funnel sessions.
//!
//! A [`Session`] only moves forward through [`Step`] via its transition
//! methods; each one checks the current step first and leaves the session
//! untouched when it does not match.
//!
//! [`SessionStore`] hands out one lane per user. Holding a lane's lock for
//! the whole handling of an event serializes that user's events while
//! different users proceed concurrently.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex as AsyncMutex;
use upstream::{Network, TokenInfo};

use crate::catalog::Package;
use crate::error::FunnelError;

pub type UserId = i64;

/// Where a user is in the funnel. No session at all means idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AwaitingCa,
    AwaitingPackage,
    AwaitingPaymentConfirm,
    AwaitingTxid,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::AwaitingCa => "AWAITING_CA",
            Step::AwaitingPackage => "AWAITING_PACKAGE",
            Step::AwaitingPaymentConfirm => "AWAITING_PAYMENT_CONFIRM",
            Step::AwaitingTxid => "AWAITING_TXID",
        };
        f.write_str(s)
    }
}

/// One user's progress and collected data.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: UserId,
    pub step: Step,
    pub network: Network,
    pub token: Option<TokenInfo>,
    pub package: Option<Package>,
    /// Amount due in the network's native unit.
    pub payable_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: UserId, network: Network) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            step: Step::AwaitingCa,
            network,
            token: None,
            package: None,
            payable_amount: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fail unless the session is at `expected`.
    pub fn expect_step(&self, expected: Step) -> Result<(), FunnelError> {
        if self.step != expected {
            return Err(FunnelError::UnexpectedInput(format!(
                "expected {expected}, session is at {}",
                self.step
            )));
        }
        Ok(())
    }

    /// AWAITING_CA -> AWAITING_PACKAGE.
    pub fn record_token(&mut self, token: TokenInfo) -> Result<(), FunnelError> {
        self.expect_step(Step::AwaitingCa)?;
        self.token = Some(token);
        self.advance(Step::AwaitingPackage);
        Ok(())
    }

    /// AWAITING_PACKAGE -> AWAITING_PAYMENT_CONFIRM.
    pub fn record_quote(&mut self, package: Package, payable: Decimal) -> Result<(), FunnelError> {
        self.expect_step(Step::AwaitingPackage)?;
        self.package = Some(package);
        self.payable_amount = Some(payable);
        self.advance(Step::AwaitingPaymentConfirm);
        Ok(())
    }

    /// AWAITING_PAYMENT_CONFIRM -> AWAITING_PACKAGE, dropping the quote.
    pub fn back_to_packages(&mut self) -> Result<(), FunnelError> {
        self.expect_step(Step::AwaitingPaymentConfirm)?;
        self.package = None;
        self.payable_amount = None;
        self.advance(Step::AwaitingPackage);
        Ok(())
    }

    /// AWAITING_PAYMENT_CONFIRM -> AWAITING_TXID.
    pub fn confirm_payment(&mut self) -> Result<(), FunnelError> {
        self.expect_step(Step::AwaitingPaymentConfirm)?;
        self.advance(Step::AwaitingTxid);
        Ok(())
    }

    fn advance(&mut self, step: Step) {
        self.step = step;
        self.updated_at = Utc::now();
    }
}

/// A user's slot: `None` while idle.
pub type SessionLane = Arc<AsyncMutex<Option<Session>>>;

/// All live sessions, keyed by user.
#[derive(Debug, Default)]
pub struct SessionStore {
    lanes: Mutex<HashMap<UserId, SessionLane>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lane for `user`, created on first use.
    pub fn lane(&self, user: UserId) -> SessionLane {
        let mut lanes = self.lanes.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(lanes.entry(user).or_default())
    }

    /// Copy of the user's current session, if any and not busy.
    pub fn snapshot(&self, user: UserId) -> Option<Session> {
        let lanes = self.lanes.lock().unwrap_or_else(|e| e.into_inner());
        let lane = lanes.get(&user)?;
        let slot = lane.try_lock().ok()?;
        slot.clone()
    }

    /// Drop lanes nobody holds and that carry no session.
    pub fn prune_idle(&self) {
        let mut lanes = self.lanes.lock().unwrap_or_else(|e| e.into_inner());
        lanes.retain(|_, lane| {
            // Another handle means someone may be about to lock it.
            if Arc::strong_count(lane) > 1 {
                return true;
            }
            match lane.try_lock() {
                Ok(slot) => slot.is_some(),
                Err(_) => true,
            }
        });
    }

    /// Number of users with an open session.
    pub fn active_count(&self) -> usize {
        let lanes = self.lanes.lock().unwrap_or_else(|e| e.into_inner());
        lanes
            .values()
            .filter(|lane| lane.try_lock().map_or(true, |slot| slot.is_some()))
            .count()
    }

    #[cfg(test)]
    fn lane_count(&self) -> usize {
        self.lanes.lock().unwrap().len()
    }
}
