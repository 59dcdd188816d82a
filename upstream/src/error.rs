use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("token not found: {0}")]
    TokenNotFound(String),

    #[error("price unavailable: {0}")]
    PriceUnavailable(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl UpstreamError {
    /// True when the upstream answered but had nothing for the query.
    ///
    /// Everything else (transport, status, decoding) is a lookup failure
    /// that may succeed on retry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::TokenNotFound(_))
    }

    /// True when the request never produced a usable response in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Request(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, UpstreamError>;
