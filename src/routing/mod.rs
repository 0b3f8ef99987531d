pub mod async_generator;
pub mod channel_delegate;
pub mod quote_book;
pub mod sync_generator;

use crate::core::{
    IncentiveContext, OutGivenInRequest, PoolInfo, Route, RouteLimits, SwapError, SwapResult,
    TokenOutByTokenInResult,
};
use crate::discovery::{PoolGraph, RouteDiscovery, ScoredRoute};
use crate::selection::QuoteCalculator;
use arc_swap::ArcSwap;
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::sync::Arc;

pub use crate::selection::RouteQuote;
pub use async_generator::AsyncRouteGenerator;
pub use channel_delegate::{ChannelDelegate, RouteOutcome};
pub use quote_book::{QuoteBook, QuoteSlot};
pub use sync_generator::SyncRouteGenerator;

/// Receives exactly one outcome per request.
pub trait TokenOutGivenInRouteDelegate: Send + Sync {
    fn receive_quote(
        &self,
        request: OutGivenInRequest,
        route: Route,
        result: TokenOutByTokenInResult,
    );

    fn receive_error(&self, request: OutGivenInRequest, error: SwapError);
}

/// Request/delegate facade over route search and quoting.
pub trait RouteGenerator: Send + Sync {
    /// Replaces the delegate; outcomes go to whichever delegate is set at delivery.
    fn set_token_in_delegate(&self, delegate: Arc<dyn TokenOutGivenInRouteDelegate>);

    fn update_pools(&self, pools: Vec<PoolInfo>);

    fn update_incentives_info(&self, pool_ids: Vec<String>, incentive_base_denom: String);

    fn request_token_out_by_token_in(&self, request: OutGivenInRequest);
}

/// Everything one request reads: pools, their graph and incentive info.
#[derive(Debug, Clone, Default)]
pub struct RoutingSnapshot {
    pub graph: Arc<PoolGraph>,
    pub incentives: Arc<IncentiveContext>,
}

impl RoutingSnapshot {
    pub fn candidate_routes(
        &self,
        token_in: &str,
        token_out: &str,
        limits: &RouteLimits,
    ) -> Vec<ScoredRoute> {
        RouteDiscovery::new(&self.graph, &self.incentives).candidate_routes(token_in, token_out, limits)
    }

    pub fn quote(&self, request: &OutGivenInRequest, limits: &RouteLimits) -> SwapResult<RouteQuote> {
        let candidates =
            self.candidate_routes(&request.base_denom_in, &request.base_denom_out, limits);
        QuoteCalculator::new(&self.graph, &self.incentives, *limits).quote(request, &candidates)
    }
}

/// State shared by both generator flavours.
pub struct RoutingState {
    snapshot: ArcSwap<RoutingSnapshot>,
    delegate: RwLock<Option<Arc<dyn TokenOutGivenInRouteDelegate>>>,
    limits: RouteLimits,
}

impl RoutingState {
    pub fn new(limits: RouteLimits) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(RoutingSnapshot::default()),
            delegate: RwLock::new(None),
            limits,
        }
    }

    pub fn limits(&self) -> RouteLimits {
        self.limits
    }

    /// The snapshot a request started now would see.
    pub fn snapshot(&self) -> Arc<RoutingSnapshot> {
        self.snapshot.load_full()
    }

    pub fn set_delegate(&self, delegate: Arc<dyn TokenOutGivenInRouteDelegate>) {
        *self.delegate.write() = Some(delegate);
    }

    pub fn update_pools(&self, pools: Vec<PoolInfo>) {
        let graph = Arc::new(PoolGraph::build(&pools));
        info!(
            "Pool snapshot updated: {} of {} pools usable, {} denoms",
            graph.pool_count(),
            pools.len(),
            graph.denom_count()
        );

        self.snapshot.rcu(|current| RoutingSnapshot {
            graph: graph.clone(),
            incentives: current.incentives.clone(),
        });
    }

    pub fn update_incentives(&self, pool_ids: Vec<String>, incentive_base_denom: String) {
        let incentives = Arc::new(IncentiveContext::new(pool_ids, incentive_base_denom));
        info!(
            "Incentive info updated: {} pools, base denom {:?}",
            incentives.pool_ids.len(),
            incentives.base_denom
        );

        self.snapshot.rcu(|current| RoutingSnapshot {
            graph: current.graph.clone(),
            incentives: incentives.clone(),
        });
    }

    /// Hands `outcome` to the current delegate, or drops it when none is set.
    pub fn deliver(&self, request: OutGivenInRequest, outcome: SwapResult<RouteQuote>) {
        let delegate = self.delegate.read().clone();
        let Some(delegate) = delegate else {
            warn!("No delegate set, dropping outcome for {}", request.key());
            return;
        };

        match outcome {
            Ok(quote) => {
                debug!("Delivering quote for {} via {}", request.key(), quote.route);
                delegate.receive_quote(request, quote.route, quote.result);
            }
            Err(error) => {
                debug!("Delivering error for {}: {}", request.key(), error);
                delegate.receive_error(request, error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PoolAsset;
    use rust_decimal::Decimal;

    fn pool(id: &str) -> PoolInfo {
        PoolInfo::weighted(
            id,
            vec![PoolAsset::new("uatom", 1_000_000), PoolAsset::new("uosmo", 1_000_000)],
            Decimal::new(3, 3),
        )
    }

    #[test]
    fn test_pool_and_incentive_updates_are_independent() {
        let state = RoutingState::new(RouteLimits::default());

        // Pools before incentives are kept, not dropped.
        state.update_pools(vec![pool("1")]);
        assert_eq!(state.snapshot().graph.pool_count(), 1);
        assert!(state.snapshot().incentives.is_empty());

        state.update_incentives(vec!["1".to_string()], "uosmo".to_string());
        let snapshot = state.snapshot();
        assert_eq!(snapshot.graph.pool_count(), 1);
        assert!(snapshot.incentives.is_incentivized("1"));

        state.update_pools(vec![pool("1"), pool("2")]);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.graph.pool_count(), 2);
        assert!(snapshot.incentives.is_incentivized("1"));
    }

    #[test]
    fn test_loaded_snapshot_is_unaffected_by_later_updates() {
        let state = RoutingState::new(RouteLimits::default());
        state.update_pools(vec![pool("1")]);
        let held = state.snapshot();

        state.update_pools(Vec::new());
        assert_eq!(held.graph.pool_count(), 1);
        assert_eq!(state.snapshot().graph.pool_count(), 0);
    }
}
