//! HTTP behaviour of the upstream clients against mock servers.

use std::time::Duration;

use rust_decimal_macros::dec;
use serde_json::json;
use upstream::{ActivationClient, ActivationRequest, DexResolver, Network, PaymentVerifier, PriceOracle, TxStatus, UpstreamError};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(2);
const MINT: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

fn pair_json(name: &str, liquidity: Option<f64>) -> serde_json::Value {
    let mut pair = json!({
        "url": format!("https://dexscreener.com/solana/{name}"),
        "baseToken": { "address": MINT, "name": name, "symbol": name.to_uppercase() },
        "priceUsd": "0.5",
        "fdv": 250000.0,
        "info": { "imageUrl": format!("https://img/{name}.png"), "socials": [] }
    });
    if let Some(usd) = liquidity {
        pair["liquidity"] = json!({ "usd": usd });
    }
    pair
}

// ---------------------------------------------------------------------------
// DexResolver
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_resolve_picks_deepest_pair() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/latest/dex/tokens/{MINT}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pairs": [
                pair_json("shallow", Some(100.0)),
                pair_json("deep", Some(90_000.0)),
                pair_json("none", None),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = DexResolver::new(&server.uri(), TIMEOUT).unwrap();
    let info = resolver.resolve(MINT).await.unwrap();

    assert_eq!(info.name, "deep");
    assert_eq!(info.liquidity_usd, Some(90_000.0));
    assert_eq!(info.logo_url.as_deref(), Some("https://img/deep.png"));
    assert_eq!(info.address, MINT);
}

#[tokio::test]
async fn test_resolve_escapes_address_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest/dex/tokens/coin%2Fx%3Fy%23z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pairs": [pair_json("odd", Some(1.0))]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = DexResolver::new(&server.uri(), TIMEOUT).unwrap();
    let info = resolver.resolve("coin/x?y#z").await.unwrap();
    assert_eq!(info.name, "odd");
    assert_eq!(info.address, "coin/x?y#z");
}

#[tokio::test]
async fn test_resolve_no_pairs_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pairs": null })))
        .mount(&server)
        .await;

    let resolver = DexResolver::new(&server.uri(), TIMEOUT).unwrap();
    let err = resolver.resolve(MINT).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_resolve_server_error_is_lookup_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let resolver = DexResolver::new(&server.uri(), TIMEOUT).unwrap();
    let err = resolver.resolve(MINT).await.unwrap_err();
    assert!(!err.is_not_found());
    assert!(matches!(err, UpstreamError::Http { status: 502, .. }));
}

#[tokio::test]
async fn test_resolve_malformed_payload_is_lookup_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let resolver = DexResolver::new(&server.uri(), TIMEOUT).unwrap();
    let err = resolver.resolve(MINT).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Json(_)));
}

#[tokio::test]
async fn test_resolve_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "pairs": [] }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let resolver = DexResolver::new(&server.uri(), Duration::from_millis(50)).unwrap();
    let err = resolver.resolve(MINT).await.unwrap_err();
    assert!(err.is_timeout());
    assert!(!err.is_not_found());
}

#[test]
fn test_invalid_base_url_rejected() {
    assert!(matches!(
        DexResolver::new("not a url", TIMEOUT),
        Err(UpstreamError::InvalidUrl(_))
    ));
}

// ---------------------------------------------------------------------------
// PriceOracle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_quote_maps_network_to_asset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .and(query_param("ids", "ethereum"))
        .and(query_param("vs_currencies", "usd"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ethereum": { "usd": 3125.5 } })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let oracle = PriceOracle::new(&server.uri(), TIMEOUT).unwrap();
    assert_eq!(oracle.quote(Network::Eth).await.unwrap(), dec!(3125.5));
    // BASE prices off the same asset.
    assert_eq!(oracle.quote(Network::Base).await.unwrap(), dec!(3125.5));
}

#[tokio::test]
async fn test_quote_empty_result_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let oracle = PriceOracle::new(&server.uri(), TIMEOUT).unwrap();
    assert!(matches!(
        oracle.quote(Network::Sol).await,
        Err(UpstreamError::PriceUnavailable(_))
    ));
}

// ---------------------------------------------------------------------------
// PaymentVerifier
// ---------------------------------------------------------------------------

async fn rpc_server(body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "getSignatureStatuses" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_status_confirmed() {
    let server = rpc_server(json!({
        "jsonrpc": "2.0", "id": 1,
        "result": { "context": { "slot": 1 }, "value": [{ "slot": 1, "confirmationStatus": "confirmed" }] }
    }))
    .await;
    let verifier = PaymentVerifier::new(&server.uri(), TIMEOUT).unwrap();
    assert_eq!(verifier.check_status("abc123").await, TxStatus::Confirmed);
}

#[tokio::test]
async fn test_status_unknown_is_pending() {
    let server = rpc_server(json!({
        "jsonrpc": "2.0", "id": 1,
        "result": { "context": { "slot": 1 }, "value": [null] }
    }))
    .await;
    let verifier = PaymentVerifier::new(&server.uri(), TIMEOUT).unwrap();
    assert_eq!(verifier.check_status("abc123").await, TxStatus::Pending);
}

#[tokio::test]
async fn test_status_rpc_error_is_pending() {
    let server = rpc_server(json!({
        "jsonrpc": "2.0", "id": 1,
        "error": { "code": -32602, "message": "Invalid param" }
    }))
    .await;
    let verifier = PaymentVerifier::new(&server.uri(), TIMEOUT).unwrap();
    assert!(verifier.fetch_status("abc123").await.is_err());
    assert_eq!(verifier.check_status("abc123").await, TxStatus::Pending);
}

#[tokio::test]
async fn test_status_unreachable_is_pending() {
    // Nothing listens here once the server is dropped.
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let verifier = PaymentVerifier::new(&uri, TIMEOUT).unwrap();
    assert_eq!(verifier.check_status("abc123").await, TxStatus::Pending);
}

// ---------------------------------------------------------------------------
// ActivationClient
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_activate_posts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/activate"))
        .and(body_partial_json(json!({ "mint": MINT, "network": "SOL", "priceUsd": "0.5" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ActivationClient::new(&server.uri(), TIMEOUT).unwrap();
    client
        .activate(&ActivationRequest {
            mint: MINT.into(),
            name: "Bonk".into(),
            price_usd: Some("0.5".into()),
            market_cap: Some(250_000.0),
            logo_url: None,
            dex_url: None,
            network: "SOL".into(),
        })
        .await
        .unwrap();
}
