use std::time::Duration;

use tracing::info;

use crate::error::Result;
use crate::rest::UpstreamHttpClient;
use crate::types::ActivationRequest;

/// Client for the external service that starts a trending campaign.
#[derive(Debug, Clone)]
pub struct ActivationClient {
    http: UpstreamHttpClient,
}

impl ActivationClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: UpstreamHttpClient::new(base_url, timeout)?,
        })
    }

    /// POST /activate.
    pub async fn activate(&self, req: &ActivationRequest) -> Result<()> {
        self.http.post_json_ignore("/activate", req).await?;
        info!(mint = %req.mint, network = %req.network, "activation delivered");
        Ok(())
    }
}
