use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use bidchain_types::{ImpId, Price};

#[derive(Parser)]
#[command(
    name = "bidchain",
    about = "Signed, hash-linked price ledgers for ad impressions",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run an ad server (originator and responder endpoints)
    Serve(ServeArgs),
    /// Originate a ledger with a signed creation
    Create(CreateArgs),
    /// Append a signed price update to an existing ledger
    Update(UpdateArgs),
    /// Verify ledger integrity and signatures
    Verify(VerifyArgs),
    /// Print the current price of a ledger
    Price(PriceArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Base URL of the responding ad server
    #[arg(long)]
    pub peer: Option<String>,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub imp_id: ImpId,
    #[arg(long)]
    pub price: Price,
    /// Write the ledger here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub ledger: PathBuf,
    #[arg(long)]
    pub price: Price,
    /// Impression id to sign under; defaults to the ledger's own
    #[arg(long)]
    pub imp_id: Option<ImpId>,
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct VerifyArgs {
    #[arg(long)]
    pub ledger: PathBuf,
}

#[derive(Args)]
pub struct PriceArgs {
    #[arg(long)]
    pub ledger: PathBuf,
}
