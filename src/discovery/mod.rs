pub mod graph;
pub mod pool_loader;
pub mod route_finder;
pub mod route_scorer;

use crate::core::{IncentiveContext, RouteLimits};
use log::debug;

pub use graph::{PoolEdge, PoolGraph};
pub use pool_loader::{IncentivesFile, PoolLoader};
pub use route_finder::RouteFinder;
pub use route_scorer::{RouteScorer, ScoredRoute};

/// Main interface for route discovery over one pool snapshot
pub struct RouteDiscovery<'a> {
    graph: &'a PoolGraph,
    incentives: &'a IncentiveContext,
}

impl<'a> RouteDiscovery<'a> {
    pub fn new(graph: &'a PoolGraph, incentives: &'a IncentiveContext) -> Self {
        Self { graph, incentives }
    }

    /// Enumerate, score and keep the best candidate routes for a pair
    pub fn candidate_routes(
        &self,
        token_in: &str,
        token_out: &str,
        limits: &RouteLimits,
    ) -> Vec<ScoredRoute> {
        let routes =
            RouteFinder::new(self.graph, limits.max_pools_in_route).find_routes(token_in, token_out);
        let found = routes.len();

        let ranked = RouteScorer::new(self.graph, self.incentives)
            .rank(routes, limits.max_routes_per_request);

        debug!(
            "Kept {} of {} routes {} -> {}",
            ranked.len(),
            found,
            token_in,
            token_out
        );

        ranked
    }
}
