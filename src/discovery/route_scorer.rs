use crate::core::{IncentiveContext, Route, SwapError, SwapResult};
use crate::discovery::graph::PoolGraph;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Candidate route with its cheap ranking heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRoute {
    pub route: Route,
    /// Product of fee-inclusive per-hop spot prices, out per in.
    pub spot_price: Decimal,
    /// Whether any hop goes through an incentivized pool.
    pub incentivized: bool,
}

/// Route scoring service
pub struct RouteScorer<'a> {
    graph: &'a PoolGraph,
    incentives: &'a IncentiveContext,
}

impl<'a> RouteScorer<'a> {
    pub fn new(graph: &'a PoolGraph, incentives: &'a IncentiveContext) -> Self {
        Self { graph, incentives }
    }

    /// Score a single route
    ///
    /// Hops whose pool cannot quote a spot price (empty reserves, missing
    /// denom) score the whole route at zero instead of failing the search.
    pub fn score_route(&self, route: Route) -> ScoredRoute {
        let spot_price = match self.spot_price_product(&route) {
            Ok(price) => price,
            Err(e) => {
                debug!("Route {} scored zero: {}", route, e);
                Decimal::ZERO
            }
        };
        let incentivized = route
            .hops
            .iter()
            .any(|hop| self.incentives.is_incentivized(&hop.pool_id));

        ScoredRoute {
            route,
            spot_price,
            incentivized,
        }
    }

    fn spot_price_product(&self, route: &Route) -> SwapResult<Decimal> {
        route.hops.iter().try_fold(Decimal::ONE, |acc, hop| {
            let pool = self
                .graph
                .pool(&hop.pool_id)
                .ok_or_else(|| SwapError::InvalidPoolState(format!("unknown pool {}", hop.pool_id)))?;
            let spot = pool.spot_price(&hop.token_in_denom, &hop.token_out_denom)?;
            acc.checked_mul(spot).ok_or(SwapError::MathOverflow)
        })
    }

    /// Scores, deduplicates by pool-id sequence and keeps the best `limit`.
    pub fn rank(&self, routes: Vec<Route>, limit: usize) -> Vec<ScoredRoute> {
        let mut scored: Vec<ScoredRoute> =
            routes.into_iter().map(|route| self.score_route(route)).collect();
        scored.sort_by(compare_scored);

        let mut seen: HashSet<Vec<String>> = HashSet::new();
        scored.retain(|candidate| {
            let key = candidate
                .route
                .hops
                .iter()
                .map(|hop| hop.pool_id.clone())
                .collect();
            seen.insert(key)
        });
        scored.truncate(limit);

        for candidate in &scored {
            debug!(
                "Candidate {} spot={} incentivized={}",
                candidate.route, candidate.spot_price, candidate.incentivized
            );
        }

        scored
    }
}

/// Best first: higher spot price, then incentivized, then fewer hops, then
/// pool ids and denoms in lexicographic order.
fn compare_scored(a: &ScoredRoute, b: &ScoredRoute) -> Ordering {
    b.spot_price
        .cmp(&a.spot_price)
        .then_with(|| b.incentivized.cmp(&a.incentivized))
        .then_with(|| a.route.len().cmp(&b.route.len()))
        .then_with(|| a.route.pool_ids().cmp(&b.route.pool_ids()))
        .then_with(|| {
            let denoms = |r: &ScoredRoute| {
                r.route
                    .hops
                    .iter()
                    .map(|hop| hop.token_out_denom.clone())
                    .collect::<Vec<_>>()
            };
            denoms(a).cmp(&denoms(b))
        })
}
