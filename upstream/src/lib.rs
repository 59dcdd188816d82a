pub mod activation;
pub mod chain;
pub mod client;
pub mod config;
pub mod dex;
pub mod error;
pub mod price;
pub mod rest;
pub mod types;
pub mod utils;

// ---- Top-level re-exports for ergonomic usage ----

// Clients
pub use activation::ActivationClient;
pub use chain::PaymentVerifier;
pub use client::Upstream;
pub use dex::DexResolver;
pub use price::PriceOracle;
pub use rest::UpstreamHttpClient;

// Config + errors
pub use config::UpstreamConfig;
pub use error::{Result, UpstreamError};

// Core enums
pub use types::{Network, TxStatus};

// Token metadata + wire types
pub use types::{ActivationRequest, DexPair, DexTokenResponse, TokenInfo};
