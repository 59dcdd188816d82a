//! The conversational funnel: network -> token -> package -> quote ->
//! payment -> admin approval.
//!
//! [`Funnel::handle`] takes one inbound event for one user and returns the
//! replies to deliver. Events for the same user are serialized on that
//! user's session lane; the replay guard and activation relay are shared
//! by everyone.

use chrono::Utc;
use tracing::{debug, info, warn};
use upstream::utils::{validate_token_address, validate_txid};
use upstream::{Network, TxStatus, Upstream, UpstreamError};

use crate::catalog::Package;
use crate::config::BotConfig;
use crate::error::FunnelError;
use crate::input::{Action, Inbound};
use crate::pricing::payable_amount;
use crate::relay::{ActivationRelay, PendingActivation};
use crate::replay::ReplayGuard;
use crate::reply::{self, Reply};
use crate::session::{Session, SessionStore, Step, UserId};

pub struct Funnel {
    config: BotConfig,
    upstream: Upstream,
    sessions: SessionStore,
    replay: ReplayGuard,
    relay: ActivationRelay,
}

impl Funnel {
    pub fn new(config: BotConfig, upstream: Upstream) -> Self {
        Self {
            config,
            upstream,
            sessions: SessionStore::new(),
            replay: ReplayGuard::new(),
            relay: ActivationRelay::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn replay(&self) -> &ReplayGuard {
        &self.replay
    }

    pub fn relay(&self) -> &ActivationRelay {
        &self.relay
    }

    /// Handle one event. Failures never escape: they become (at most) a
    /// short reply to the user and leave the session as it was.
    pub async fn handle(&self, user: UserId, event: Inbound) -> Vec<Reply> {
        let lane = self.sessions.lane(user);
        let result = {
            let mut slot = lane.lock().await;
            self.dispatch(user, event, &mut slot).await
        };
        drop(lane);
        self.sessions.prune_idle();

        match result {
            Ok(replies) => replies,
            Err(e) => self.report(user, e),
        }
    }

    async fn dispatch(
        &self,
        user: UserId,
        event: Inbound,
        slot: &mut Option<Session>,
    ) -> Result<Vec<Reply>, FunnelError> {
        match event {
            Inbound::Start => Ok(vec![reply::welcome(user)]),
            Inbound::Text(text) => self.on_text(user, text.trim(), slot).await,
            Inbound::Action(action) => self.on_action(user, action, slot).await,
        }
    }

    async fn on_action(
        &self,
        user: UserId,
        action: Action,
        slot: &mut Option<Session>,
    ) -> Result<Vec<Reply>, FunnelError> {
        match action {
            Action::Begin => Ok(vec![reply::network_menu(user)]),

            Action::SelectNetwork(network) => {
                // Picking a network always starts over.
                *slot = Some(Session::new(user, network));
                info!(user_id = user, %network, "session started");
                Ok(vec![reply::ca_prompt(user)])
            }

            Action::BackToNetworks => {
                active(slot)?.expect_step(Step::AwaitingPackage)?;
                Ok(vec![reply::network_menu(user)])
            }

            Action::SelectPackage(package) => self.select_package(user, package, slot).await,

            Action::BackToPackages => {
                active_mut(slot)?.back_to_packages()?;
                Ok(vec![reply::package_menu(user)])
            }

            Action::Confirm => {
                let session = active_mut(slot)?;
                let payable = session
                    .payable_amount
                    .ok_or_else(|| FunnelError::UnexpectedInput("no quote on session".into()))?;
                session.confirm_payment()?;
                let wallet = self.config.wallets.address(session.network);
                info!(user_id = user, network = %session.network, %payable, "wallet revealed");
                Ok(vec![reply::wallet_reveal(user, session.network, payable, wallet)])
            }

            Action::Paid => {
                active(slot)?.expect_step(Step::AwaitingTxid)?;
                Ok(vec![reply::txid_prompt(user)])
            }

            Action::AdminApprove(reference) => self.approve(user, &reference).await,
        }
    }

    async fn on_text(
        &self,
        user: UserId,
        text: &str,
        slot: &mut Option<Session>,
    ) -> Result<Vec<Reply>, FunnelError> {
        let Some(session) = slot.as_ref() else {
            debug!(user_id = user, "text without session ignored");
            return Ok(Vec::new());
        };

        let step = session.step;
        debug!(user_id = user, %step, since = %session.updated_at, "text received");
        match step {
            Step::AwaitingCa => self.submit_token(user, text, slot).await,
            Step::AwaitingTxid => self.submit_txid(user, text, slot).await,
            step => Err(FunnelError::UnexpectedInput(format!(
                "free text not expected at {step}"
            ))),
        }
    }

    /// AWAITING_CA: resolve the address and move on to packages.
    async fn submit_token(
        &self,
        user: UserId,
        address: &str,
        slot: &mut Option<Session>,
    ) -> Result<Vec<Reply>, FunnelError> {
        let network = active(slot)?.network;
        validate_token_address(network, address)
            .map_err(|e| FunnelError::UnexpectedInput(e.to_string()))?;

        let token = self
            .upstream
            .dex
            .resolve(address)
            .await
            .map_err(|e| match e {
                UpstreamError::TokenNotFound(addr) => FunnelError::NotFound(addr),
                other => FunnelError::LookupFailed(other),
            })?;

        info!(user_id = user, %network, symbol = %token.symbol, "token resolved");
        let card = reply::token_card(user, &token);
        active_mut(slot)?.record_token(token)?;
        Ok(vec![card, reply::package_menu(user)])
    }

    /// AWAITING_PACKAGE: quote the package in the network's native unit.
    async fn select_package(
        &self,
        user: UserId,
        package: &'static Package,
        slot: &mut Option<Session>,
    ) -> Result<Vec<Reply>, FunnelError> {
        let session = active(slot)?;
        session.expect_step(Step::AwaitingPackage)?;
        let network = session.network;

        let unit_price = self
            .upstream
            .prices
            .quote(network)
            .await
            .map_err(FunnelError::Unavailable)?;

        let payable = payable_amount(package.usd_price, unit_price).ok_or_else(|| {
            FunnelError::Unavailable(UpstreamError::PriceUnavailable(format!(
                "cannot convert with unit price {unit_price}"
            )))
        })?;

        let session = active_mut(slot)?;
        session.record_quote(*package, payable)?;
        info!(user_id = user, %network, package = package.label, %unit_price, %payable, "package quoted");

        let token = session
            .token
            .as_ref()
            .ok_or_else(|| FunnelError::UnexpectedInput("no token on session".into()))?;
        Ok(vec![reply::payment_summary(
            user,
            network,
            token,
            package.label,
            package.usd_price,
            payable,
        )])
    }

    /// AWAITING_TXID: admit the id once, stage the activation, end the session.
    async fn submit_txid(
        &self,
        user: UserId,
        txid: &str,
        slot: &mut Option<Session>,
    ) -> Result<Vec<Reply>, FunnelError> {
        let session = active(slot)?;
        session.expect_step(Step::AwaitingTxid)?;
        let txid: &str = &validate_txid(session.network, txid)
            .map_err(|e| FunnelError::UnexpectedInput(e.to_string()))?;

        let (token, package, payable) = match (&session.token, session.package, session.payable_amount) {
            (Some(t), Some(p), Some(a)) => (t.clone(), p, a),
            _ => {
                return Err(FunnelError::UnexpectedInput(
                    "session is missing order details".into(),
                ))
            }
        };
        let network = session.network;
        let funnel_secs = (Utc::now() - session.created_at).num_seconds();

        let chain_status = if self.config.require_confirmed && network == Network::Sol {
            if self.replay.contains(txid) {
                return Err(FunnelError::DuplicateSubmission(txid.to_string()));
            }
            let status = self.chain_status(network, txid).await;
            if !status.is_confirmed() {
                return Err(FunnelError::PaymentPending(txid.to_string()));
            }
            self.replay.admit(txid)?;
            status
        } else {
            self.replay.admit(txid)?;
            self.chain_status(network, txid).await
        };

        let pending = PendingActivation {
            user_id: user,
            network,
            token,
            package_label: package.label,
            usd_price: package.usd_price,
            payable_amount: payable,
            txid: txid.to_string(),
            chain_status,
            submitted_at: Utc::now(),
        };
        let reference = self.relay.stage(pending.clone());
        let admin_reply = reply::admin_request(self.config.admin_id, &reference, &pending);

        *slot = None;
        info!(
            user_id = user,
            %network,
            txid,
            reference = %reference,
            %chain_status,
            funnel_secs,
            "payment submitted"
        );

        Ok(vec![reply::submission_ack(user), admin_reply])
    }

    /// Only Solana payments can be looked up; everything else stays
    /// `Pending` for the admin to check by hand.
    async fn chain_status(&self, network: Network, txid: &str) -> TxStatus {
        match network {
            Network::Sol => self.upstream.chain.check_status(txid).await,
            _ => TxStatus::Pending,
        }
    }

    /// Admin-only: consume the reference, activate, broadcast.
    async fn approve(&self, user: UserId, reference: &str) -> Result<Vec<Reply>, FunnelError> {
        if user != self.config.admin_id {
            return Err(FunnelError::Unauthorized(user));
        }

        let pending = self.relay.consume(reference)?;

        if let Err(e) = self
            .upstream
            .activation
            .activate(&pending.activation_request())
            .await
        {
            warn!(reference, error = %e, "activation call failed");
        }

        let started = Utc::now();
        info!(reference, user_id = pending.user_id, symbol = %pending.token.symbol, "trending activated");
        Ok(vec![
            reply::broadcast(&self.config.channel, &pending, started),
            reply::admin_ack(user),
        ])
    }

    fn report(&self, user: UserId, err: FunnelError) -> Vec<Reply> {
        match &err {
            FunnelError::MissingReference(_) => debug!(user_id = user, error = %err, "ignored"),
            FunnelError::UnexpectedInput(_) | FunnelError::UnknownPackage(_) => {
                info!(user_id = user, error = %err, "rejected input")
            }
            _ => warn!(user_id = user, error = %err, "event failed"),
        }
        err.user_message()
            .map(|msg| vec![Reply::to_user(user, msg)])
            .unwrap_or_default()
    }
}

fn active(slot: &Option<Session>) -> Result<&Session, FunnelError> {
    slot.as_ref()
        .ok_or_else(|| FunnelError::UnexpectedInput("no active session".into()))
}

fn active_mut(slot: &mut Option<Session>) -> Result<&mut Session, FunnelError> {
    slot.as_mut()
        .ok_or_else(|| FunnelError::UnexpectedInput("no active session".into()))
}
