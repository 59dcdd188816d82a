use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{Result, UpstreamError};

/// HTTP client wrapper shared by every upstream service.
///
/// Every request is bounded by the timeout given at construction.
#[derive(Debug, Clone)]
pub struct UpstreamHttpClient {
    client: Client,
    base_url: String,
}

impl UpstreamHttpClient {
    /// Build a client for `base_url`, rejecting URLs that do not parse.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        self.get_url(&url, query).await
    }

    /// GET a JSON resource under the base URL, one path segment per element.
    ///
    /// Segments are percent-encoded, so `/`, `?` and `#` inside a segment
    /// stay part of it.
    pub async fn get_segments<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Malformed(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        self.get_url(url.as_str(), query).await
    }

    async fn get_url<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let resp = self.client.get(url).query(query).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Http {
                status,
                message: body,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let bytes = self.post_raw(path, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// POST a JSON body, discarding whatever the server answers.
    pub async fn post_json_ignore<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.post_raw(path, body).await.map(|_| ())
    }

    async fn post_raw<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.post(&url).json(body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Http {
                status,
                message: body,
            });
        }

        resp.bytes().await.map(|b| b.to_vec()).map_err(UpstreamError::Request)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
