use crate::error::{Result, UpstreamError};
use crate::types::Network;

/// Upper bound for free-form identifiers on chains without a fixed format.
const MAX_FREEFORM_LEN: usize = 128;

/// Shortest transaction id accepted on non-EVM chains.
const MIN_TXID_LEN: usize = 6;

/// Decode a hex string (with optional `0x` prefix) to bytes.
///
/// # Errors
///
/// Returns `UpstreamError::Validation` if the hex string is invalid.
pub fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(stripped).map_err(|e| UpstreamError::Validation(format!("invalid hex string: {e}")))
}

/// Decode a base58 string to bytes.
///
/// # Errors
///
/// Returns `UpstreamError::Validation` if the string is not base58.
pub fn decode_base58(value: &str) -> Result<Vec<u8>> {
    bs58::decode(value)
        .into_vec()
        .map_err(|e| UpstreamError::Validation(format!("invalid base58 string: {e}")))
}

/// Check that `value` looks like a token address on `network`.
///
/// Solana mints are 32-byte base58 keys and EVM tokens are 20-byte
/// `0x` addresses. SUI coin types and XRPL currency codes only get a
/// shape check.
pub fn validate_token_address(network: Network, value: &str) -> Result<()> {
    match network {
        Network::Sol => expect_base58_len(value, 32, "token address"),
        n if n.is_evm() => expect_prefixed_hex_len(value, 20, "token address"),
        _ => expect_freeform(value, "token address"),
    }
}

/// Check that `value` looks like a transaction id on `network` and return
/// its canonical spelling.
///
/// EVM hashes are `0x` + 32 bytes of hex, lowercased. Elsewhere only the
/// shape is checked: 6..=128 ASCII alphanumerics, which covers base58
/// signatures, base58 digests and bare hex hashes. XRP hashes are hex and
/// come back uppercased; base58 ids are case-sensitive and kept as given.
pub fn validate_txid(network: Network, value: &str) -> Result<String> {
    if network.is_evm() {
        expect_prefixed_hex_len(value, 32, "transaction hash")?;
        return Ok(value.to_ascii_lowercase());
    }
    if value.len() < MIN_TXID_LEN || value.len() > MAX_FREEFORM_LEN {
        return Err(UpstreamError::Validation(format!(
            "transaction id must be {MIN_TXID_LEN}..={MAX_FREEFORM_LEN} characters"
        )));
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(UpstreamError::Validation(
            "transaction id must be alphanumeric".into(),
        ));
    }
    match network {
        Network::Xrp => Ok(value.to_ascii_uppercase()),
        _ => Ok(value.to_string()),
    }
}

fn expect_base58_len(value: &str, len: usize, what: &str) -> Result<()> {
    let bytes = decode_base58(value)?;
    if bytes.len() != len {
        return Err(UpstreamError::Validation(format!(
            "{what} must decode to {len} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(())
}

fn expect_prefixed_hex_len(value: &str, len: usize, what: &str) -> Result<()> {
    if !value.starts_with("0x") {
        return Err(UpstreamError::Validation(format!("{what} must start with 0x")));
    }
    expect_hex_len(value, len, what)
}

fn expect_hex_len(value: &str, len: usize, what: &str) -> Result<()> {
    let bytes = decode_hex(value)?;
    if bytes.len() != len {
        return Err(UpstreamError::Validation(format!(
            "{what} must be {len} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(())
}

fn expect_freeform(value: &str, what: &str) -> Result<()> {
    if value.is_empty() || value.len() > MAX_FREEFORM_LEN {
        return Err(UpstreamError::Validation(format!(
            "{what} must be 1..={MAX_FREEFORM_LEN} characters"
        )));
    }
    if !value.is_ascii() || value.chars().any(char::is_whitespace) {
        return Err(UpstreamError::Validation(format!(
            "{what} must be ASCII without whitespace"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOL_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn sol_signature() -> String {
        bs58::encode([7u8; 64]).into_string()
    }

    #[test]
    fn test_solana_mint_accepted() {
        assert!(validate_token_address(Network::Sol, SOL_MINT).is_ok());
    }

    #[test]
    fn test_solana_mint_wrong_length_rejected() {
        let short = bs58::encode([1u8; 20]).into_string();
        assert!(validate_token_address(Network::Sol, &short).is_err());
        assert!(validate_token_address(Network::Sol, "not base58 0OIl").is_err());
    }

    #[test]
    fn test_evm_address() {
        let addr = format!("0x{}", "ab".repeat(20));
        assert!(validate_token_address(Network::Eth, &addr).is_ok());
        assert!(validate_token_address(Network::Base, &addr).is_ok());
        // Missing prefix
        assert!(validate_token_address(Network::Bsc, &"ab".repeat(20)).is_err());
        // Solana mint on an EVM chain
        assert!(validate_token_address(Network::Eth, SOL_MINT).is_err());
    }

    #[test]
    fn test_freeform_address() {
        assert!(validate_token_address(Network::Sui, "0x2::sui::SUI").is_ok());
        assert!(validate_token_address(Network::Xrp, "SOLO.rsoLo2S1kiGeCcn6hCUXVrCpGMWLrRrLZz").is_ok());
        assert!(validate_token_address(Network::Sui, "").is_err());
        assert!(validate_token_address(Network::Xrp, "two words").is_err());
        assert!(validate_token_address(Network::Xrp, &"a".repeat(129)).is_err());
    }

    #[test]
    fn test_txid_formats() {
        assert!(validate_txid(Network::Sol, &sol_signature()).is_ok());
        assert!(validate_txid(Network::Sol, "abc123").is_ok());
        assert!(validate_txid(Network::Sol, "abc").is_err());
        assert!(validate_txid(Network::Sol, "abc 123").is_err());
        assert!(validate_txid(Network::Sui, "abc-123").is_err());

        let evm = format!("0x{}", "cd".repeat(32));
        assert!(validate_txid(Network::Eth, &evm).is_ok());
        assert!(validate_txid(Network::Bsc, &"cd".repeat(32)).is_err());
        assert!(validate_txid(Network::Base, "abc123").is_err());

        assert!(validate_txid(Network::Xrp, &"CD".repeat(32)).is_ok());
        assert!(validate_txid(Network::Xrp, &"a".repeat(129)).is_err());
    }

    #[test]
    fn test_txid_canonical_case() {
        let upper = format!("0x{}", "CD".repeat(32));
        let lower = format!("0x{}", "cd".repeat(32));
        assert_eq!(validate_txid(Network::Eth, &upper).unwrap(), lower);
        assert_eq!(validate_txid(Network::Bsc, &lower).unwrap(), lower);

        assert_eq!(validate_txid(Network::Xrp, &"cd".repeat(32)).unwrap(), "CD".repeat(32));

        let sig = sol_signature();
        assert_eq!(validate_txid(Network::Sol, &sig).unwrap(), sig);
        assert_eq!(validate_txid(Network::Sui, "AbC123xyz").unwrap(), "AbC123xyz");
    }
}
