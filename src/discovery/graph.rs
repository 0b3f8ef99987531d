use crate::core::PoolInfo;
use log::{debug, warn};
use std::collections::HashMap;

/// One directed traversal through a pool: `token_in -> token_out`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolEdge {
    pub pool_id: String,
    pub token_in: String,
    pub token_out: String,
}

/// Denom adjacency graph over a pool snapshot.
///
/// Every valid pool contributes an edge in both directions for each unordered
/// pair of its assets. Pools that fail validation, or that reuse an id already
/// present in the snapshot, are left out.
#[derive(Debug, Clone, Default)]
pub struct PoolGraph {
    pools: Vec<PoolInfo>,
    index: HashMap<String, usize>,
    adjacency: HashMap<String, Vec<PoolEdge>>,
}

impl PoolGraph {
    pub fn build(pools: &[PoolInfo]) -> Self {
        let mut graph = Self::default();

        for pool in pools {
            if let Err(reason) = pool.validate() {
                warn!("Skipping invalid pool {}: {}", pool.id, reason);
                continue;
            }
            if graph.index.contains_key(&pool.id) {
                warn!("Skipping duplicate pool id {}", pool.id);
                continue;
            }

            for (i, asset_a) in pool.assets.iter().enumerate() {
                for asset_b in pool.assets.iter().skip(i + 1) {
                    graph.add_edge(&pool.id, &asset_a.denom, &asset_b.denom);
                    graph.add_edge(&pool.id, &asset_b.denom, &asset_a.denom);
                }
            }

            graph.index.insert(pool.id.clone(), graph.pools.len());
            graph.pools.push(pool.clone());
        }

        debug!(
            "Built pool graph: {} pools, {} denoms",
            graph.pools.len(),
            graph.adjacency.len()
        );

        graph
    }

    fn add_edge(&mut self, pool_id: &str, token_in: &str, token_out: &str) {
        self.adjacency
            .entry(token_in.to_string())
            .or_default()
            .push(PoolEdge {
                pool_id: pool_id.to_string(),
                token_in: token_in.to_string(),
                token_out: token_out.to_string(),
            });
    }

    pub fn pool(&self, pool_id: &str) -> Option<&PoolInfo> {
        self.index.get(pool_id).map(|&i| &self.pools[i])
    }

    /// Pools accepted into the graph, in snapshot order.
    pub fn pools(&self) -> &[PoolInfo] {
        &self.pools
    }

    pub fn edges_from(&self, denom: &str) -> &[PoolEdge] {
        self.adjacency
            .get(denom)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains_denom(&self, denom: &str) -> bool {
        self.adjacency.contains_key(denom)
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn denom_count(&self) -> usize {
        self.adjacency.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PoolAsset;
    use rust_decimal::Decimal;

    fn pool(id: &str, denoms: &[&str]) -> PoolInfo {
        PoolInfo::weighted(
            id,
            denoms.iter().map(|d| PoolAsset::new(*d, 1_000_000)).collect(),
            Decimal::new(3, 3),
        )
    }

    #[test]
    fn test_multi_asset_pool_connects_every_pair() {
        let graph = PoolGraph::build(&[pool("1", &["uatom", "uosmo", "uion"])]);

        assert_eq!(graph.pool_count(), 1);
        assert_eq!(graph.denom_count(), 3);
        assert_eq!(graph.edges_from("uatom").len(), 2);
        assert_eq!(graph.edges_from("uion").len(), 2);
        assert!(graph.edges_from("uusdc").is_empty());
    }

    #[test]
    fn test_invalid_and_duplicate_pools_are_skipped() {
        let mut bad_fee = pool("2", &["uatom", "uusdc"]);
        bad_fee.swap_fee = Decimal::ONE;

        let graph = PoolGraph::build(&[
            pool("1", &["uatom", "uosmo"]),
            bad_fee,
            pool("1", &["uion", "uosmo"]),
        ]);

        assert_eq!(graph.pool_count(), 1);
        assert!(graph.pool("2").is_none());
        assert!(!graph.contains_denom("uusdc"));
        assert!(!graph.contains_denom("uion"));
        assert_eq!(graph.pool("1").map(|p| p.assets.len()), Some(2));
    }
}
