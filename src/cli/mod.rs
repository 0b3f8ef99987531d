use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod display;

#[derive(Parser)]
#[command(name = "swaproute")]
#[command(about = "Multi-hop AMM route search and swap quote tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Quote the best route (or split) for an exact input amount
    Quote(QuoteArgs),

    /// List ranked candidate routes between two denoms
    Routes(RoutesArgs),

    /// List the pools in a snapshot
    Pools(PoolsArgs),
}

/// Where the pool and incentive snapshots come from
#[derive(Args, Clone)]
pub struct SnapshotArgs {
    /// Pool snapshot JSON file (defaults to POOL_SNAPSHOT_PATH)
    #[arg(long, env = "POOL_SNAPSHOT_PATH")]
    pub pools: Option<PathBuf>,

    /// Incentive info JSON file: { "pool_ids": [...], "base_denom": "..." }
    #[arg(long)]
    pub incentives: Option<PathBuf>,
}

#[derive(Args, Clone, Copy)]
pub struct LimitArgs {
    /// Maximum pools in one route (overrides MAX_POOLS_IN_ROUTE)
    #[arg(long)]
    pub max_hops: Option<usize>,

    /// Maximum candidate routes per request (overrides MAX_ROUTES_PER_REQUEST)
    #[arg(long)]
    pub max_routes: Option<usize>,
}

#[derive(Parser)]
pub struct QuoteArgs {
    /// Input denom or symbol
    pub denom_in: String,

    /// Amount to swap, in input base units
    pub amount: u128,

    /// Output denom or symbol
    pub denom_out: String,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    #[command(flatten)]
    pub limits: LimitArgs,

    /// Run the request through the background generator
    #[arg(long = "async")]
    pub use_async: bool,

    /// Print the quote as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct RoutesArgs {
    /// Input denom or symbol
    pub denom_in: String,

    /// Output denom or symbol
    pub denom_out: String,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    #[command(flatten)]
    pub limits: LimitArgs,
}

#[derive(Parser)]
pub struct PoolsArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Show reserves, weights and amplification
    #[arg(short, long)]
    pub detailed: bool,
}
