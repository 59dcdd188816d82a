use clap::{Parser, Subcommand};

/// weibo-trending — payment funnel for trending slot purchases.
#[derive(Parser, Debug)]
#[command(name = "weibo-trending", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the funnel against a stdin/stdout channel
    Console(ConsoleArgs),

    /// Resolve a token address and print its metadata
    Lookup(LookupArgs),

    /// Print the payable amount for a package on a network
    Quote(QuoteArgs),

    /// Print the chain status of a transaction
    Verify(VerifyArgs),
}

/// Arguments for the `console` subcommand.
#[derive(Parser, Debug)]
pub struct ConsoleArgs {
    /// User id the console starts acting as
    #[arg(long, default_value = "1")]
    pub user: i64,

    /// Print replies as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Require on-chain confirmation before accepting a TXID
    #[arg(long)]
    pub require_confirmed: bool,
}

/// Arguments for the `lookup` subcommand.
#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// Token contract address
    pub address: String,
}

/// Arguments for the `quote` subcommand.
#[derive(Parser, Debug)]
pub struct QuoteArgs {
    /// Network symbol (SOL, ETH, BSC, BASE, SUI, XRP)
    pub network: String,

    /// Package label (e.g. 24H)
    pub package: String,
}

/// Arguments for the `verify` subcommand.
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Solana transaction signature
    pub txid: String,
}
