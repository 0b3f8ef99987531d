use crate::cli::commands::LoadedSnapshot;
use crate::cli::{display::QuoteDisplay, PoolsArgs};
use crate::core::{Config, SwapResult};
use colored::*;
use std::collections::BTreeMap;

pub async fn execute(args: PoolsArgs, config: &Config) -> SwapResult<()> {
    println!("{}", "🚀 Swap Route Pool Snapshot".bold().cyan());

    let snapshot = LoadedSnapshot::load(config, &args.snapshot)?;
    let pools = snapshot.pools;

    if pools.is_empty() {
        println!("{}", "❌ Snapshot contains no pools".red().bold());
        return Ok(());
    }

    // Group pools by type for summary
    let mut pool_counts = BTreeMap::new();
    for pool in &pools {
        *pool_counts.entry(pool.pool_type().to_string()).or_insert(0) += 1;
    }

    println!(
        "\n{} Found {} pools total",
        "📊".bold(),
        pools.len().to_string().green().bold()
    );
    for (pool_type, count) in pool_counts {
        println!("   • {}: {}", pool_type, count);
    }

    if let Some(incentives) = &snapshot.incentives {
        println!(
            "   • Incentivized: {}",
            incentives.pool_ids.join(", ").yellow()
        );
    }

    QuoteDisplay::display_pool_list(&pools, args.detailed);

    if !args.detailed {
        println!(
            "{}",
            "💡 Tip: Use --detailed flag for more pool information".dimmed()
        );
    }

    Ok(())
}
