pub mod simulation;
pub mod split;

use crate::core::{
    IncentiveContext, OutGivenInRequest, Route, RouteLimits, SplitLeg, SwapError, SwapResult,
    TokenOutByTokenInResult,
};
use crate::discovery::{PoolGraph, ScoredRoute};
use crate::quotes::{floor_to_u128, to_decimal};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use simulation::{simulate_route, RouteSimulation};
pub use split::{best_allocation, Allocation, MAX_SPLIT_ROUTES};

/// A delivered quote: the primary route plus the full result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteQuote {
    pub route: Route,
    pub result: TokenOutByTokenInResult,
}

/// Turns candidate routes into a single quote for one request
pub struct QuoteCalculator<'a> {
    graph: &'a PoolGraph,
    incentives: &'a IncentiveContext,
    limits: RouteLimits,
}

impl<'a> QuoteCalculator<'a> {
    pub fn new(graph: &'a PoolGraph, incentives: &'a IncentiveContext, limits: RouteLimits) -> Self {
        Self {
            graph,
            incentives,
            limits,
        }
    }

    pub fn simulate(&self, route: &Route, amount_in: u128) -> SwapResult<RouteSimulation> {
        simulate_route(
            self.graph,
            self.incentives,
            self.limits.incentive_fee_discount,
            route,
            amount_in,
        )
    }

    /// Quote `request` over ranked `candidates`.
    ///
    /// With no candidates a zero-amount request gets an empty route and a zero
    /// result; any other request fails with `NoRoute`.
    pub fn quote(
        &self,
        request: &OutGivenInRequest,
        candidates: &[ScoredRoute],
    ) -> SwapResult<RouteQuote> {
        if candidates.is_empty() {
            if request.base_amount_in == 0 {
                return Ok(RouteQuote {
                    route: Route::empty(&request.base_denom_in, &request.base_denom_out),
                    result: TokenOutByTokenInResult::zero(),
                });
            }
            return Err(SwapError::no_route(
                &request.base_denom_in,
                &request.base_denom_out,
            ));
        }

        if request.base_amount_in == 0 {
            return self.quote_zero_amount(candidates);
        }

        let amount_in = request.base_amount_in;

        // Full-amount run of every candidate decides which ones enter the grid.
        // A failing candidate only drops out; the request fails when none is left.
        let mut viable: Vec<RouteSimulation> = Vec::with_capacity(candidates.len());
        let mut first_liquidity_error = None;
        let mut first_curve_error = None;
        for candidate in candidates {
            match self.simulate(&candidate.route, amount_in) {
                Ok(sim) => {
                    debug!(
                        "Route {} -> out={} spot={}",
                        candidate.route, sim.amount_out, sim.before_spot_price
                    );
                    viable.push(sim);
                }
                Err(e) if e.is_insufficient_liquidity() => {
                    debug!("Route {} cannot absorb {}: {}", candidate.route, amount_in, e);
                    first_liquidity_error.get_or_insert(e);
                }
                Err(e) => {
                    warn!("Dropping route {}: {}", candidate.route, e);
                    first_curve_error.get_or_insert(e);
                }
            }
        }

        // Best single routes first; sort is stable so heuristic rank breaks ties.
        viable.sort_by(|a, b| b.amount_out.cmp(&a.amount_out));
        viable.truncate(MAX_SPLIT_ROUTES);

        let allocation = best_allocation(
            viable.len(),
            amount_in,
            self.limits.split_granularity,
            |index, amount| self.simulate(&viable[index].route, amount),
        )?;

        let allocation = match allocation {
            Some(allocation) if allocation.amount_out > 0 => allocation,
            _ => {
                return Err(first_liquidity_error
                    .or(first_curve_error)
                    .unwrap_or_else(|| {
                        let pool_id = candidates[0]
                            .route
                            .hops
                            .first()
                            .map(|hop| hop.pool_id.as_str())
                            .unwrap_or_default();
                        SwapError::insufficient_liquidity(
                            pool_id,
                            &request.base_denom_in,
                            &request.base_denom_out,
                        )
                    }))
            }
        };

        let quote = aggregate(allocation.legs, amount_in)?;
        info!(
            "Quoted {} {} -> {} {} via {} ({} legs, impact {})",
            amount_in,
            request.base_denom_in,
            quote.result.amount,
            request.base_denom_out,
            quote.route,
            quote.result.split.len(),
            quote.result.price_impact
        );
        Ok(quote)
    }

    /// Zero-amount request: the first candidate that can quote at all wins.
    fn quote_zero_amount(&self, candidates: &[ScoredRoute]) -> SwapResult<RouteQuote> {
        for candidate in candidates {
            match self.simulate(&candidate.route, 0) {
                Ok(sim) => return aggregate(vec![sim], 0),
                Err(e) if e.is_insufficient_liquidity() => {
                    debug!("Route {} has no spot price: {}", candidate.route, e);
                }
                Err(e) => warn!("Route {} has no spot price: {}", candidate.route, e),
            }
        }

        Ok(RouteQuote {
            route: candidates[0].route.clone(),
            result: TokenOutByTokenInResult::zero(),
        })
    }
}

fn invert(price: Decimal) -> Decimal {
    Decimal::ONE.checked_div(price).unwrap_or(Decimal::ZERO)
}

/// Folds the winning legs into one result; prices and fee are input-weighted.
fn aggregate(legs: Vec<RouteSimulation>, amount_in: u128) -> SwapResult<RouteQuote> {
    let total_in = to_decimal(amount_in)?;
    let amount: u128 = legs.iter().map(|leg| leg.amount_out).sum();

    let mut before = Decimal::ZERO;
    let mut before_without_fee = Decimal::ZERO;
    let mut after = Decimal::ZERO;
    let mut swap_fee = Decimal::ZERO;
    for leg in &legs {
        let weight = if total_in.is_zero() {
            Decimal::ONE / Decimal::from(legs.len() as u64)
        } else {
            to_decimal(leg.amount_in)? / total_in
        };
        before += weight * leg.before_spot_price;
        before_without_fee += weight * leg.before_spot_price_without_fee;
        after += weight * leg.after_spot_price;
        swap_fee += weight * leg.swap_fee;
    }

    let effective = if total_in.is_zero() {
        before
    } else {
        to_decimal(amount)? / total_in
    };

    let price_impact = if before.is_zero() {
        Decimal::ZERO
    } else {
        clamp_impact(Decimal::ONE - effective / before)
    };

    let token_in_fee_amount = floor_to_u128(
        total_in
            .checked_mul(swap_fee)
            .ok_or(SwapError::MathOverflow)?,
    )?;

    let route = legs
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.amount_in.cmp(&b.1.amount_in).then(b.0.cmp(&a.0)))
        .map(|(_, leg)| leg.route.clone())
        .ok_or_else(|| SwapError::Other("allocation has no legs".to_string()))?;

    let multi_hop_incentive_discount = legs.iter().any(|leg| leg.incentive_discount);
    let split = legs
        .into_iter()
        .map(|leg| SplitLeg {
            route: leg.route,
            amount_in: leg.amount_in,
            amount_out: leg.amount_out,
        })
        .collect();

    Ok(RouteQuote {
        route,
        result: TokenOutByTokenInResult {
            amount,
            before_spot_price_in_over_out: invert(before),
            before_spot_price_out_over_in: before,
            before_spot_price_without_swap_fee_out_over_in: before_without_fee,
            after_spot_price_in_over_out: invert(after),
            after_spot_price_out_over_in: after,
            effective_price_in_over_out: invert(effective),
            effective_price_out_over_in: effective,
            swap_fee,
            token_in_fee_amount,
            price_impact,
            multi_hop_incentive_discount,
            split,
        },
    })
}

fn clamp_impact(impact: Decimal) -> Decimal {
    if impact < Decimal::ZERO || impact > Decimal::ONE {
        warn!("Price impact {} outside [0, 1], clamping", impact);
        impact.clamp(Decimal::ZERO, Decimal::ONE)
    } else {
        impact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PoolAsset, PoolInfo};
    use crate::discovery::RouteDiscovery;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn pool(id: &str, a: (&str, u128), b: (&str, u128), fee: &str) -> PoolInfo {
        PoolInfo::weighted(
            id,
            vec![PoolAsset::new(a.0, a.1), PoolAsset::new(b.0, b.1)],
            dec(fee),
        )
    }

    fn quote(
        pools: &[PoolInfo],
        incentives: &IncentiveContext,
        limits: RouteLimits,
        request: &OutGivenInRequest,
    ) -> SwapResult<RouteQuote> {
        let graph = PoolGraph::build(pools);
        let candidates = RouteDiscovery::new(&graph, incentives).candidate_routes(
            &request.base_denom_in,
            &request.base_denom_out,
            &limits,
        );
        QuoteCalculator::new(&graph, incentives, limits).quote(request, &candidates)
    }

    #[test]
    fn test_single_pool_quote() {
        let pools = [pool("1", ("uatom", 1_000_000_000), ("uosmo", 10_000_000_000), "0.002")];
        let request = OutGivenInRequest::new("uatom", 1_000_000, "uosmo");
        let quote = quote(&pools, &IncentiveContext::default(), RouteLimits::default(), &request)
            .unwrap();
        let direct = pools[0].swap_exact_amount_in("uatom", 1_000_000, "uosmo").unwrap();

        assert_eq!(quote.result.amount, direct.amount_out);
        assert_eq!(quote.result.swap_fee, dec("0.002"));
        assert_eq!(quote.result.token_in_fee_amount, 2_000);
        assert_eq!(quote.result.before_spot_price_out_over_in, dec("9.98"));
        assert_eq!(quote.result.before_spot_price_without_swap_fee_out_over_in, dec("10"));
        assert!(quote.result.price_impact > Decimal::ZERO);
        assert!(quote.result.price_impact < dec("0.01"));
        assert_eq!(quote.result.split.len(), 1);
        assert!(!quote.result.multi_hop_incentive_discount);
    }

    #[test]
    fn test_parallel_pools_split_large_order() {
        let pools = [
            pool("1", ("uatom", 1_000_000), ("uosmo", 1_000_000), "0"),
            pool("2", ("uatom", 1_000_000), ("uosmo", 1_000_000), "0"),
        ];
        let request = OutGivenInRequest::new("uatom", 1_000_000, "uosmo");
        let quote = quote(&pools, &IncentiveContext::default(), RouteLimits::default(), &request)
            .unwrap();

        // Half to each pool: 2 * floor(1e6 * 5e5 / 1.5e6)
        assert_eq!(quote.result.amount, 666_666);
        assert_eq!(quote.result.split.len(), 2);
        assert_eq!(
            quote.result.split.iter().map(|leg| leg.amount_in).sum::<u128>(),
            1_000_000
        );
    }

    #[test]
    fn test_zero_amount_without_route_is_not_an_error() {
        let request = OutGivenInRequest::new("uatom", 0, "uion");
        let quote = quote(&[], &IncentiveContext::default(), RouteLimits::default(), &request)
            .unwrap();

        assert!(quote.route.is_empty());
        assert_eq!(quote.result, TokenOutByTokenInResult::zero());
    }

    #[test]
    fn test_zero_amount_with_route_reports_spot_prices() {
        let pools = [pool("1", ("uatom", 1_000_000_000), ("uosmo", 10_000_000_000), "0.003")];
        let request = OutGivenInRequest::new("uatom", 0, "uosmo");
        let quote = quote(&pools, &IncentiveContext::default(), RouteLimits::default(), &request)
            .unwrap();

        assert_eq!(quote.result.amount, 0);
        assert_eq!(quote.result.effective_price_out_over_in, dec("9.97"));
        assert_eq!(quote.result.after_spot_price_out_over_in, dec("9.97"));
        assert_eq!(quote.result.price_impact, Decimal::ZERO);
        assert_eq!(quote.route.pool_ids(), vec!["1"]);
    }

    #[test]
    fn test_missing_path_is_no_route() {
        let pools = [pool("1", ("uatom", 1_000), ("uosmo", 1_000), "0.003")];
        let request = OutGivenInRequest::new("uatom", 10, "uion");
        let err = quote(&pools, &IncentiveContext::default(), RouteLimits::default(), &request)
            .unwrap_err();
        assert!(err.is_no_route());
    }

    #[test]
    fn test_dry_pool_is_insufficient_liquidity() {
        let pools = [pool("1", ("uatom", 1_000_000), ("uosmo", 0), "0.003")];
        let request = OutGivenInRequest::new("uatom", 1_000, "uosmo");
        let err = quote(&pools, &IncentiveContext::default(), RouteLimits::default(), &request)
            .unwrap_err();
        assert_eq!(err, SwapError::insufficient_liquidity("1", "uatom", "uosmo"));
    }

    #[test]
    fn test_broken_pool_does_not_block_healthy_route() {
        let healthy = pool("w", ("uusdc", 1_000_000_000), ("uusdt", 1_000_000_000), "0.003");
        let drained = PoolInfo::stable(
            "s",
            vec![
                PoolAsset::new("uusdc", 1_000_000_000),
                PoolAsset::new("uusdt", 1_000_000_000),
                PoolAsset::new("udai", 0),
            ],
            dec("0.0005"),
            100,
        );
        let oversized = pool(
            "x",
            ("uusdc", 100_000_000_000_000_000_000_000_000_000),
            ("uusdt", 100_000_000_000_000_000_000_000_000_000),
            "0.003",
        );
        let incentives = IncentiveContext::default();
        let expected = healthy
            .swap_exact_amount_in("uusdc", 1_000_000, "uusdt")
            .unwrap()
            .amount_out;

        for broken in [drained, oversized] {
            let pools = [broken.clone(), healthy.clone()];

            let request = OutGivenInRequest::new("uusdc", 1_000_000, "uusdt");
            let quoted = quote(&pools, &incentives, RouteLimits::default(), &request).unwrap();
            assert_eq!(quoted.route.pool_ids(), vec!["w"]);
            assert_eq!(quoted.result.amount, expected);

            let spot_request = OutGivenInRequest::new("uusdc", 0, "uusdt");
            let spot = quote(&pools, &incentives, RouteLimits::default(), &spot_request).unwrap();
            assert_eq!(spot.result.before_spot_price_out_over_in, dec("0.997"));
        }
    }

    #[test]
    fn test_only_oversized_pool_surfaces_math_error() {
        let pools = [pool(
            "x",
            ("uusdc", 100_000_000_000_000_000_000_000_000_000),
            ("uusdt", 100_000_000_000_000_000_000_000_000_000),
            "0.003",
        )];
        let request = OutGivenInRequest::new("uusdc", 1_000_000, "uusdt");
        let err = quote(&pools, &IncentiveContext::default(), RouteLimits::default(), &request)
            .unwrap_err();
        assert_eq!(err, SwapError::MathOverflow);
    }

    #[test]
    fn test_clamp_impact() {
        assert_eq!(clamp_impact(dec("-0.1")), Decimal::ZERO);
        assert_eq!(clamp_impact(dec("1.5")), Decimal::ONE);
        assert_eq!(clamp_impact(dec("0.25")), dec("0.25"));
    }
}
