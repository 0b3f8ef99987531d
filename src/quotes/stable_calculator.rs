use crate::core::{
    PoolInfo, PoolState, SwapError, SwapResult, STABLE_CONVERGENCE_TOLERANCE,
    STABLE_MAX_ITERATIONS,
};
use crate::quotes::{to_decimal, CurveCalculator};
use log::debug;
use rust_decimal::Decimal;

/// Stable pool calculator
/// Uses the StableSwap invariant for minimal slippage on correlated assets
///
/// The invariant is homogeneous of degree one, so every reserve is divided by
/// the pool's total reserve before iterating. That keeps the Newton steps
/// inside `Decimal` range for realistic base-unit balances.
pub struct StableCurve;

struct Normalized {
    reserves: Vec<Decimal>,
    scale: Decimal,
    ann: Decimal,
    n: Decimal,
}

impl StableCurve {
    fn normalize(pool: &PoolInfo) -> SwapResult<Normalized> {
        let amp_factor = match pool.pool_state {
            PoolState::Stable { amp_factor } => amp_factor,
            PoolState::Weighted => {
                return Err(SwapError::InvalidPoolState(format!(
                    "pool {} is not a stable pool",
                    pool.id
                )))
            }
        };

        let count = pool.assets.len();
        let n = Decimal::from(count as u64);
        let ann = (0..count).try_fold(Decimal::from(amp_factor), |acc, _| {
            acc.checked_mul(n).ok_or(SwapError::MathOverflow)
        })?;

        let raw = pool
            .assets
            .iter()
            .map(|asset| to_decimal(asset.amount))
            .collect::<SwapResult<Vec<_>>>()?;
        let scale = raw.iter().try_fold(Decimal::ZERO, |acc, reserve| {
            acc.checked_add(*reserve).ok_or(SwapError::MathOverflow)
        })?;
        let reserves = raw
            .iter()
            .map(|reserve| reserve.checked_div(scale).ok_or(SwapError::MathOverflow))
            .collect::<SwapResult<Vec<_>>>()?;

        Ok(Normalized {
            reserves,
            scale,
            ann,
            n,
        })
    }

    /// D^(n+1) / (n^n * prod(x_i))
    fn d_product(d: Decimal, reserves: &[Decimal], n: Decimal) -> SwapResult<Decimal> {
        reserves.iter().try_fold(d, |acc, reserve| {
            let denominator = reserve.checked_mul(n).ok_or(SwapError::MathOverflow)?;
            acc.checked_mul(d)
                .and_then(|v| v.checked_div(denominator))
                .ok_or(SwapError::MathOverflow)
        })
    }

    /// Solve A*n^n*sum(x_i) + D = A*n^n*D + D^(n+1) / (n^n * prod(x_i)) for D
    fn calculate_d(reserves: &[Decimal], ann: Decimal, n: Decimal) -> SwapResult<Decimal> {
        let sum = reserves.iter().copied().sum::<Decimal>();
        if sum.is_zero() {
            return Ok(Decimal::ZERO);
        }

        let mut d = sum;
        for _ in 0..STABLE_MAX_ITERATIONS {
            let d_product = Self::d_product(d, reserves, n)?;
            let previous = d;

            let numerator = ann
                .checked_mul(sum)
                .and_then(|v| v.checked_add(d_product.checked_mul(n)?))
                .and_then(|v| v.checked_mul(d))
                .ok_or(SwapError::MathOverflow)?;
            let denominator = (ann - Decimal::ONE)
                .checked_mul(d)
                .and_then(|v| v.checked_add(d_product.checked_mul(n + Decimal::ONE)?))
                .ok_or(SwapError::MathOverflow)?;
            if denominator.is_zero() {
                return Err(SwapError::MathOverflow);
            }

            d = numerator / denominator;
            if (d - previous).abs() <= STABLE_CONVERGENCE_TOLERANCE {
                return Ok(d);
            }
        }

        Err(SwapError::Other(
            "StableSwap invariant did not converge".to_string(),
        ))
    }

    /// New balance of `index_out` that keeps D fixed once `index_in` holds `new_in`.
    fn calculate_y(
        reserves: &[Decimal],
        index_in: usize,
        index_out: usize,
        new_in: Decimal,
        d: Decimal,
        ann: Decimal,
        n: Decimal,
    ) -> SwapResult<Decimal> {
        let mut c = d;
        let mut sum = Decimal::ZERO;
        for (index, reserve) in reserves.iter().enumerate() {
            if index == index_out {
                continue;
            }
            let x = if index == index_in { new_in } else { *reserve };
            sum = sum.checked_add(x).ok_or(SwapError::MathOverflow)?;
            c = c
                .checked_mul(d)
                .and_then(|v| v.checked_div(x.checked_mul(n)?))
                .ok_or(SwapError::MathOverflow)?;
        }
        c = c
            .checked_mul(d)
            .and_then(|v| v.checked_div(ann.checked_mul(n)?))
            .ok_or(SwapError::MathOverflow)?;
        let b = sum
            .checked_add(d.checked_div(ann).ok_or(SwapError::MathOverflow)?)
            .ok_or(SwapError::MathOverflow)?;

        let mut y = d;
        for _ in 0..STABLE_MAX_ITERATIONS {
            let previous = y;
            let numerator = y
                .checked_mul(y)
                .and_then(|v| v.checked_add(c))
                .ok_or(SwapError::MathOverflow)?;
            let denominator = Decimal::TWO * y + b - d;
            if denominator <= Decimal::ZERO {
                return Err(SwapError::MathOverflow);
            }

            y = numerator / denominator;
            if (y - previous).abs() <= STABLE_CONVERGENCE_TOLERANCE {
                return Ok(y);
            }
        }

        Err(SwapError::Other(
            "StableSwap balance did not converge".to_string(),
        ))
    }
}

impl CurveCalculator for StableCurve {
    /// dF/dx_in / dF/dx_out = (Ann + D_P/x_in) / (Ann + D_P/x_out)
    fn marginal_price(
        &self,
        pool: &PoolInfo,
        index_in: usize,
        index_out: usize,
    ) -> SwapResult<Decimal> {
        let Normalized {
            reserves, ann, n, ..
        } = Self::normalize(pool)?;
        let d = Self::calculate_d(&reserves, ann, n)?;
        let d_product = Self::d_product(d, &reserves, n)?;

        let partial = |x: Decimal| {
            d_product
                .checked_div(x)
                .and_then(|v| v.checked_add(ann))
                .ok_or(SwapError::MathOverflow)
        };

        partial(reserves[index_in])?
            .checked_div(partial(reserves[index_out])?)
            .ok_or(SwapError::MathOverflow)
    }

    fn calculate_out_amount(
        &self,
        pool: &PoolInfo,
        index_in: usize,
        index_out: usize,
        amount_in_after_fee: Decimal,
    ) -> SwapResult<Decimal> {
        let Normalized {
            reserves,
            scale,
            ann,
            n,
        } = Self::normalize(pool)?;
        let d = Self::calculate_d(&reserves, ann, n)?;

        let new_in = amount_in_after_fee
            .checked_div(scale)
            .and_then(|v| v.checked_add(reserves[index_in]))
            .ok_or(SwapError::MathOverflow)?;
        let y = Self::calculate_y(&reserves, index_in, index_out, new_in, d, ann, n)?;

        debug!(
            "Stable pool {}: D={} ann={} new_in={} y={}",
            pool.id, d, ann, new_in, y
        );

        (reserves[index_out] - y)
            .max(Decimal::ZERO)
            .checked_mul(scale)
            .ok_or(SwapError::MathOverflow)
    }
}
