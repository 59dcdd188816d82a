use thiserror::Error;
use upstream::UpstreamError;

/// Why an event could not advance a user's funnel.
///
/// None of these are fatal: the session stays where it was and the user
/// (at most) sees [`FunnelError::user_message`].
#[derive(Debug, Error)]
pub enum FunnelError {
    #[error("token not found: {0}")]
    NotFound(String),

    #[error("token lookup failed: {0}")]
    LookupFailed(#[source] UpstreamError),

    #[error("price unavailable: {0}")]
    Unavailable(#[source] UpstreamError),

    #[error("transaction already submitted: {0}")]
    DuplicateSubmission(String),

    #[error("no pending activation for reference {0}")]
    MissingReference(String),

    #[error("payment not yet confirmed: {0}")]
    PaymentPending(String),

    #[error("unknown package: {0}")]
    UnknownPackage(String),

    #[error("unexpected input: {0}")]
    UnexpectedInput(String),

    #[error("user {0} is not allowed to approve activations")]
    Unauthorized(i64),
}

impl FunnelError {
    /// Short text shown to the user, or `None` when the failure is silent.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            // Both lookup outcomes read the same to the user.
            FunnelError::NotFound(_) | FunnelError::LookupFailed(_) => Some("Token not found."),
            FunnelError::Unavailable(_) => {
                Some("Price feed unavailable, please pick the package again.")
            }
            FunnelError::DuplicateSubmission(_) => {
                Some("This TXID was already submitted. Send a different one.")
            }
            FunnelError::PaymentPending(_) => {
                Some("Payment not confirmed on-chain yet. Send the TXID again shortly.")
            }
            FunnelError::UnknownPackage(_) => Some("Unknown package."),
            FunnelError::UnexpectedInput(_) => Some("That doesn't look right for this step."),
            FunnelError::MissingReference(_) | FunnelError::Unauthorized(_) => None,
        }
    }
}

/// Startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("no receiving wallet configured for {0}")]
    MissingWallet(upstream::Network),
}
