mod catalog;
mod cli;
mod config;
mod console;
mod error;
mod funnel;
mod input;
mod output;
mod pricing;
mod relay;
mod replay;
mod reply;
mod session;

use clap::Parser;
use cli::Command;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use upstream::{DexResolver, Network, PaymentVerifier, PriceOracle, Upstream};

use crate::catalog::find_package;
use crate::config::{upstream_from_env, BotConfig};
use crate::funnel::Funnel;
use crate::reply::{fmt_usd, status_line};

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize tracing
    let filter = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv(); // load .env if present

    let code = match cli.command {
        Command::Console(args) => {
            let cancel = setup_signal_handlers();
            run_console(args, cancel).await
        }
        Command::Lookup(args) => lookup(&args.address).await,
        Command::Quote(args) => quote(&args.network, &args.package).await,
        Command::Verify(args) => verify(&args.txid).await,
    };

    if let Err(msg) = code {
        error!("{msg}");
        std::process::exit(1);
    }
}

async fn run_console(args: cli::ConsoleArgs, cancel: CancellationToken) -> Result<(), String> {
    let mut config = BotConfig::from_env().map_err(|e| e.to_string())?;
    config.require_confirmed = args.require_confirmed;

    let upstream = Upstream::new(&config.upstream).map_err(|e| e.to_string())?;
    info!(
        admin_id = config.admin_id,
        channel = %config.channel,
        require_confirmed = config.require_confirmed,
        "funnel starting"
    );

    let funnel = Funnel::new(config, upstream);
    console::run_console(&funnel, args.user, args.json, cancel)
        .await
        .map_err(|e| format!("console error: {e}"))?;

    info!(
        open_sessions = funnel.sessions().active_count(),
        pending_activations = funnel.relay().pending_count(),
        consumed_txids = funnel.replay().len(),
        "funnel stopped"
    );
    Ok(())
}

async fn lookup(address: &str) -> Result<(), String> {
    let cfg = upstream_from_env();
    let resolver = DexResolver::new(&cfg.dex_url, cfg.request_timeout).map_err(|e| e.to_string())?;
    let token = resolver.resolve(address).await.map_err(|e| {
        if e.is_not_found() {
            format!("no pairs for {address}")
        } else {
            format!("lookup failed: {e}")
        }
    })?;

    println!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        token.name,
        token.symbol,
        token.price_usd.as_deref().unwrap_or("—"),
        fmt_usd(token.liquidity_usd),
        fmt_usd(token.market_cap_usd),
        token.pair_url.as_deref().unwrap_or("—"),
    );
    Ok(())
}

async fn quote(network: &str, package: &str) -> Result<(), String> {
    let network: Network = network.parse().map_err(|e| format!("{e}"))?;
    let package = find_package(&package.trim().to_ascii_uppercase())
        .ok_or_else(|| format!("unknown package {package}"))?;

    let cfg = upstream_from_env();
    let oracle = PriceOracle::new(&cfg.price_url, cfg.request_timeout).map_err(|e| e.to_string())?;
    let unit = oracle.quote(network).await.map_err(|e| format!("price unavailable: {e}"))?;
    let payable = pricing::payable_amount(package.usd_price, unit)
        .ok_or_else(|| format!("cannot convert with unit price {unit}"))?;

    println!(
        "{}\t${}\t{}\t{} {}",
        package.label,
        package.usd_price,
        unit,
        payable,
        network.native_unit()
    );
    Ok(())
}

async fn verify(txid: &str) -> Result<(), String> {
    let cfg = upstream_from_env();
    let verifier = PaymentVerifier::new(&cfg.rpc_url, cfg.request_timeout).map_err(|e| e.to_string())?;
    let status = verifier.check_status(txid).await;
    println!("{}", status_line(txid, status));
    Ok(())
}

/// Register SIGINT and SIGTERM handlers that trigger the returned token.
fn setup_signal_handlers() -> CancellationToken {
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received SIGINT, shutting down");
        cancel_clone.cancel();
    });

    #[cfg(unix)]
    {
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            let mut sig = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to register SIGTERM handler");
            sig.recv().await;
            info!("received SIGTERM, shutting down");
            cancel_clone.cancel();
        });
    }

    cancel
}
