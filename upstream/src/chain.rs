//! Advisory payment confirmation via Solana JSON-RPC.
//!
//! `getSignatureStatuses` with history search. The result is a liveness
//! hint: every failure collapses to [`TxStatus::Pending`].

use std::time::Duration;

use serde_json::json;
use tracing::{debug, warn};

use crate::error::{Result, UpstreamError};
use crate::rest::UpstreamHttpClient;
use crate::types::{JsonRpcRequest, JsonRpcResponse, SignatureStatusesResult, TxStatus};

#[derive(Debug, Clone)]
pub struct PaymentVerifier {
    http: UpstreamHttpClient,
}

impl PaymentVerifier {
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: UpstreamHttpClient::new(rpc_url, timeout)?,
        })
    }

    /// Confirmation status of `txid`; never fails.
    pub async fn check_status(&self, txid: &str) -> TxStatus {
        match self.fetch_status(txid).await {
            Ok(status) => status,
            Err(e) => {
                warn!(txid, error = %e, "status check failed, treating as pending");
                TxStatus::Pending
            }
        }
    }

    /// The raw query, with failures surfaced.
    pub async fn fetch_status(&self, txid: &str) -> Result<TxStatus> {
        let req = JsonRpcRequest::new(
            "getSignatureStatuses",
            json!([[txid], { "searchTransactionHistory": true }]),
        );
        let resp: JsonRpcResponse<SignatureStatusesResult> = self.http.post_json("", &req).await?;

        if let Some(err) = resp.error {
            return Err(UpstreamError::Malformed(format!(
                "rpc error {}: {}",
                err.code, err.message
            )));
        }
        let result = resp
            .result
            .ok_or_else(|| UpstreamError::Malformed("rpc response without result".into()))?;

        let settled = result
            .value
            .first()
            .and_then(Option::as_ref)
            .is_some_and(|s| s.is_settled());

        debug!(txid, settled, "signature status");
        Ok(if settled {
            TxStatus::Confirmed
        } else {
            TxStatus::Pending
        })
    }
}
