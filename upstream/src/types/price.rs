use std::collections::HashMap;

/// Response of `GET /simple/price?ids=..&vs_currencies=usd`:
/// `{"solana": {"usd": 172.31}}`.
pub type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;
