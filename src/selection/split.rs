use crate::core::{SwapError, SwapResult};
use crate::quotes::to_decimal;
use crate::selection::simulation::RouteSimulation;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Most routes a single allocation may spread across.
pub const MAX_SPLIT_ROUTES: usize = 3;

/// One way of dividing the input across candidate routes.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub legs: Vec<RouteSimulation>,
    pub amount_out: u128,
    pub price_impact: Decimal,
}

impl Allocation {
    fn from_legs(legs: Vec<RouteSimulation>, amount_in: u128) -> SwapResult<Self> {
        let amount_out = legs.iter().map(|leg| leg.amount_out).sum();
        let price_impact = aggregate_impact(&legs, amount_in, amount_out)?;
        Ok(Self {
            legs,
            amount_out,
            price_impact,
        })
    }

    /// Greater output, then lower impact, then fewer legs.
    fn is_better_than(&self, other: &Allocation) -> bool {
        match self.amount_out.cmp(&other.amount_out) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.price_impact.cmp(&other.price_impact) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => self.legs.len() < other.legs.len(),
            },
        }
    }
}

fn aggregate_impact(legs: &[RouteSimulation], amount_in: u128, amount_out: u128) -> SwapResult<Decimal> {
    let total_in = to_decimal(amount_in)?;
    if total_in.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let mut spot = Decimal::ZERO;
    for leg in legs {
        let weight = to_decimal(leg.amount_in)? / total_in;
        spot = spot
            .checked_add(weight.checked_mul(leg.before_spot_price).ok_or(SwapError::MathOverflow)?)
            .ok_or(SwapError::MathOverflow)?;
    }
    if spot.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let effective = to_decimal(amount_out)? / total_in;
    Ok(Decimal::ONE - effective / spot)
}

/// All ways to write `total` as an ordered sum of `parts` non-negative terms.
pub fn compositions(total: u32, parts: usize) -> Vec<Vec<u32>> {
    if parts == 0 {
        return Vec::new();
    }
    if parts == 1 {
        return vec![vec![total]];
    }

    let mut result = Vec::new();
    for first in (0..=total).rev() {
        for mut rest in compositions(total - first, parts - 1) {
            rest.insert(0, first);
            result.push(rest);
        }
    }
    result
}

/// Splits `amount` by `parts / granularity`; rounding dust goes to the largest share.
pub fn leg_amounts(amount: u128, parts: &[u32], granularity: u32) -> Vec<u128> {
    let granularity = u128::from(granularity.max(1));
    let base = amount / granularity;
    let remainder = amount % granularity;

    let mut amounts: Vec<u128> = parts
        .iter()
        .map(|&part| base * u128::from(part) + remainder * u128::from(part) / granularity)
        .collect();

    let assigned: u128 = amounts.iter().sum();
    if let Some(largest) = parts
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map(|(i, _)| i)
    {
        amounts[largest] += amount - assigned;
    }
    amounts
}

/// Grid search over allocations of `amount_in` across `candidates`.
///
/// `simulate(index, amount)` runs candidate `index` for `amount`. A leg that
/// fails disqualifies its allocation. Returns `None` when no allocation is
/// viable.
pub fn best_allocation<F>(
    candidate_count: usize,
    amount_in: u128,
    granularity: u32,
    mut simulate: F,
) -> SwapResult<Option<Allocation>>
where
    F: FnMut(usize, u128) -> SwapResult<RouteSimulation>,
{
    let legs = candidate_count.min(MAX_SPLIT_ROUTES);
    let mut cache: HashMap<(usize, u128), Option<RouteSimulation>> = HashMap::new();
    let mut best: Option<Allocation> = None;

    'grid: for parts in compositions(granularity, legs) {
        let amounts = leg_amounts(amount_in, &parts, granularity);
        let mut sims = Vec::with_capacity(legs);

        for (index, &amount) in amounts.iter().enumerate() {
            if amount == 0 {
                continue;
            }
            let sim = match cache.get(&(index, amount)) {
                Some(cached) => cached.clone(),
                None => {
                    let computed = match simulate(index, amount) {
                        Ok(sim) => Some(sim),
                        Err(e) if e.is_insufficient_liquidity() => None,
                        Err(e) => {
                            warn!("Leg {} with {} dropped: {}", index, amount, e);
                            None
                        }
                    };
                    cache.insert((index, amount), computed.clone());
                    computed
                }
            };
            match sim {
                Some(sim) => sims.push(sim),
                None => continue 'grid,
            }
        }

        if sims.is_empty() {
            continue;
        }

        let candidate = Allocation::from_legs(sims, amount_in)?;
        if best
            .as_ref()
            .map_or(true, |current| candidate.is_better_than(current))
        {
            debug!(
                "Split {:?}: out={} impact={}",
                parts, candidate.amount_out, candidate.price_impact
            );
            best = Some(candidate);
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Route;
    use pretty_assertions::assert_eq;

    fn sim(amount_in: u128, amount_out: u128) -> RouteSimulation {
        RouteSimulation {
            route: Route::empty("a", "b"),
            amount_in,
            amount_out,
            before_spot_price: Decimal::ONE,
            before_spot_price_without_fee: Decimal::ONE,
            after_spot_price: Decimal::ONE,
            swap_fee: Decimal::ZERO,
            incentive_discount: false,
        }
    }

    #[test]
    fn test_compositions_cover_simplex() {
        assert_eq!(compositions(2, 2), vec![vec![2, 0], vec![1, 1], vec![0, 2]]);
        assert_eq!(compositions(20, 3).len(), 231);
        assert!(compositions(5, 3).iter().all(|c| c.iter().sum::<u32>() == 5));
    }

    #[test]
    fn test_leg_amounts_conserve_input() {
        assert_eq!(leg_amounts(1_000, &[20, 0], 20), vec![1_000, 0]);
        assert_eq!(leg_amounts(1_001, &[10, 10], 20), vec![501, 500]);
        assert_eq!(leg_amounts(7, &[1, 2, 17], 20), vec![0, 0, 7]);

        let amounts = leg_amounts(u128::MAX, &[7, 13], 20);
        assert_eq!(amounts.iter().sum::<u128>(), u128::MAX);
    }

    #[test]
    fn test_concave_routes_share_the_input() {
        // Each route yields amount * 1000 / (1000 + amount): splitting beats either corner.
        let curve = |amount: u128| amount * 1_000 / (1_000 + amount);
        let best = best_allocation(2, 1_000, 20, |_, amount| Ok(sim(amount, curve(amount))))
            .unwrap()
            .unwrap();

        assert_eq!(best.legs.len(), 2);
        assert_eq!(best.amount_out, 2 * curve(500));
    }

    #[test]
    fn test_linear_routes_prefer_single_leg() {
        let best = best_allocation(2, 1_000, 20, |_, amount| Ok(sim(amount, amount)))
            .unwrap()
            .unwrap();
        assert_eq!(best.legs.len(), 1);
        assert_eq!(best.amount_out, 1_000);
    }

    #[test]
    fn test_failing_candidate_is_skipped() {
        let best = best_allocation(2, 100, 4, |index, amount| {
            if index == 0 {
                Err(SwapError::insufficient_liquidity("1", "a", "b"))
            } else {
                Ok(sim(amount, amount / 2))
            }
        })
        .unwrap()
        .unwrap();
        assert_eq!(best.amount_out, 50);

        let best = best_allocation(2, 100, 4, |index, amount| {
            if index == 1 {
                Err(SwapError::MathOverflow)
            } else {
                Ok(sim(amount, amount / 4))
            }
        })
        .unwrap()
        .unwrap();
        assert_eq!(best.amount_out, 25);
        assert_eq!(best.legs.len(), 1);

        let none = best_allocation(1, 100, 4, |_, _| Err(SwapError::MathOverflow)).unwrap();
        assert!(none.is_none());
    }
}
