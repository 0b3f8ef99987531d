use crate::core::{IncentiveContext, Route, SwapError, SwapResult};
use crate::discovery::PoolGraph;
use log::debug;
use rust_decimal::Decimal;

/// Outcome of pushing one amount through every hop of one route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSimulation {
    pub route: Route,
    pub amount_in: u128,
    pub amount_out: u128,
    /// Composed fee-inclusive out-per-in spot price before the trade.
    pub before_spot_price: Decimal,
    /// Composed out-per-in spot price with every fee removed.
    pub before_spot_price_without_fee: Decimal,
    /// Composed fee-inclusive out-per-in spot price at post-trade reserves.
    pub after_spot_price: Decimal,
    /// `1 - prod(1 - fee_i)` over the hops, after incentive discounts.
    pub swap_fee: Decimal,
    pub incentive_discount: bool,
}

/// Walks `route` hop by hop, feeding each hop's output into the next.
///
/// Hops through an incentivized pool that trade the incentive base denom pay
/// `fee * (1 - fee_discount)`.
pub fn simulate_route(
    graph: &PoolGraph,
    incentives: &IncentiveContext,
    fee_discount: Decimal,
    route: &Route,
    amount_in: u128,
) -> SwapResult<RouteSimulation> {
    if route.is_empty() {
        return Err(SwapError::InvalidPoolState(format!(
            "cannot simulate empty route {}",
            route
        )));
    }

    let mut amount = amount_in;
    let mut before_spot_price = Decimal::ONE;
    let mut before_spot_price_without_fee = Decimal::ONE;
    let mut after_spot_price = Decimal::ONE;
    let mut fee_retained = Decimal::ONE;
    let mut incentive_discount = false;

    for hop in &route.hops {
        let pool = graph.pool(&hop.pool_id).ok_or_else(|| {
            SwapError::InvalidPoolState(format!("route references unknown pool {}", hop.pool_id))
        })?;

        let mut fee = pool.swap_fee;
        if incentives.discounts(hop) {
            fee *= Decimal::ONE - fee_discount;
            incentive_discount = true;
        }

        let outcome =
            pool.swap_exact_amount_in_with_fee(&hop.token_in_denom, amount, &hop.token_out_denom, fee)?;
        let without_fee =
            pool.spot_price_with_fee(&hop.token_in_denom, &hop.token_out_denom, Decimal::ZERO)?;

        before_spot_price = before_spot_price
            .checked_mul(outcome.spot_price_before)
            .ok_or(SwapError::MathOverflow)?;
        before_spot_price_without_fee = before_spot_price_without_fee
            .checked_mul(without_fee)
            .ok_or(SwapError::MathOverflow)?;
        after_spot_price = after_spot_price
            .checked_mul(outcome.spot_price_after)
            .ok_or(SwapError::MathOverflow)?;
        fee_retained *= Decimal::ONE - fee;

        debug!(
            "Hop {} {} -> {}: in={} out={} fee={}",
            hop.pool_id, hop.token_in_denom, hop.token_out_denom, amount, outcome.amount_out, fee
        );
        amount = outcome.amount_out;
    }

    Ok(RouteSimulation {
        route: route.clone(),
        amount_in,
        amount_out: amount,
        before_spot_price,
        before_spot_price_without_fee,
        after_spot_price,
        swap_fee: Decimal::ONE - fee_retained,
        incentive_discount,
    })
}
