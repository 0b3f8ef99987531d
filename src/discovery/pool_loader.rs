use crate::core::{PoolInfo, SwapResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk incentive info: incentivized pool ids plus the reward denom.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncentivesFile {
    pub pool_ids: Vec<String>,
    #[serde(default)]
    pub base_denom: Option<String>,
}

impl IncentivesFile {
    /// Pool ids and reward denom, falling back to `default_denom` when the
    /// file names none.
    pub fn resolve(self, default_denom: &str) -> (Vec<String>, String) {
        let denom = self.base_denom.unwrap_or_else(|| default_denom.to_string());
        (self.pool_ids, denom)
    }
}

/// Reads pool and incentive snapshots from JSON files
pub struct PoolLoader;

impl PoolLoader {
    pub fn parse_pools(json: &str) -> SwapResult<Vec<PoolInfo>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_pools(path: &Path) -> SwapResult<Vec<PoolInfo>> {
        let pools = Self::parse_pools(&fs::read_to_string(path)?)?;
        info!("Loaded {} pools from {}", pools.len(), path.display());
        Ok(pools)
    }

    pub fn load_incentives(path: &Path) -> SwapResult<IncentivesFile> {
        let incentives: IncentivesFile = serde_json::from_str(&fs::read_to_string(path)?)?;
        info!(
            "Loaded {} incentivized pools from {}",
            incentives.pool_ids.len(),
            path.display()
        );
        Ok(incentives)
    }
}
