pub mod pools;
pub mod quote;
pub mod routes;

use crate::cli::{LimitArgs, SnapshotArgs};
use crate::core::{Config, PoolInfo, SwapError, SwapResult};
use crate::discovery::{IncentivesFile, PoolLoader};
use crate::routing::RouteGenerator;
use anyhow::Context;

/// Pools plus optional incentive info read from disk.
pub struct LoadedSnapshot {
    pub pools: Vec<PoolInfo>,
    pub incentives: Option<IncentivesFile>,
}

impl LoadedSnapshot {
    pub fn load(config: &Config, args: &SnapshotArgs) -> SwapResult<Self> {
        let path = args
            .pools
            .clone()
            .or_else(|| config.pool_snapshot_path.clone())
            .ok_or_else(|| {
                SwapError::ConfigError(
                    "No pool snapshot given; pass --pools or set POOL_SNAPSHOT_PATH".to_string(),
                )
            })?;

        let pools = PoolLoader::load_pools(&path)
            .with_context(|| format!("reading pool snapshot {}", path.display()))?;
        let incentives = args
            .incentives
            .as_deref()
            .map(|file| {
                PoolLoader::load_incentives(file)
                    .with_context(|| format!("reading incentive file {}", file.display()))
            })
            .transpose()?;

        Ok(Self { pools, incentives })
    }

    /// Pushes pools and incentive info into `generator`.
    pub fn install(self, generator: &dyn RouteGenerator, config: &Config) {
        generator.update_pools(self.pools);
        if let Some(incentives) = self.incentives {
            let (pool_ids, base_denom) = incentives.resolve(&config.incentive_base_denom);
            generator.update_incentives_info(pool_ids, base_denom);
        }
    }
}

/// Config with command-line limit overrides applied and re-validated.
pub fn apply_limits(config: &Config, limits: &LimitArgs) -> SwapResult<Config> {
    let mut config = config.clone();
    if let Some(max_hops) = limits.max_hops {
        config.max_pools_in_route = max_hops;
    }
    if let Some(max_routes) = limits.max_routes {
        config.max_routes_per_request = max_routes;
    }
    config.validate()?;
    Ok(config)
}
