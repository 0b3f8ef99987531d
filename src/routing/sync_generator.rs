use crate::core::{Config, OutGivenInRequest, PoolInfo, RouteLimits, SwapResult};
use crate::discovery::ScoredRoute;
use crate::routing::{
    RouteGenerator, RouteQuote, RoutingSnapshot, RoutingState, TokenOutGivenInRouteDelegate,
};
use std::sync::Arc;

/// Route generator that computes every request inline on the caller's thread.
pub struct SyncRouteGenerator {
    state: RoutingState,
}

impl SyncRouteGenerator {
    pub fn new(limits: RouteLimits) -> Self {
        Self {
            state: RoutingState::new(limits),
        }
    }

    pub fn from_config(config: &Config) -> SwapResult<Self> {
        Ok(Self::new(config.route_limits()?))
    }

    /// Plain function-call shape of a request.
    pub fn quote_token_out_by_token_in(&self, request: &OutGivenInRequest) -> SwapResult<RouteQuote> {
        self.state.snapshot().quote(request, &self.state.limits())
    }

    /// Ranked candidate routes for a pair under the current snapshot.
    pub fn candidate_routes(&self, token_in: &str, token_out: &str) -> Vec<ScoredRoute> {
        self.state
            .snapshot()
            .candidate_routes(token_in, token_out, &self.state.limits())
    }

    pub fn snapshot(&self) -> Arc<RoutingSnapshot> {
        self.state.snapshot()
    }
}

impl RouteGenerator for SyncRouteGenerator {
    fn set_token_in_delegate(&self, delegate: Arc<dyn TokenOutGivenInRouteDelegate>) {
        self.state.set_delegate(delegate);
    }

    fn update_pools(&self, pools: Vec<PoolInfo>) {
        self.state.update_pools(pools);
    }

    fn update_incentives_info(&self, pool_ids: Vec<String>, incentive_base_denom: String) {
        self.state.update_incentives(pool_ids, incentive_base_denom);
    }

    fn request_token_out_by_token_in(&self, request: OutGivenInRequest) {
        let outcome = self.quote_token_out_by_token_in(&request);
        self.state.deliver(request, outcome);
    }
}
