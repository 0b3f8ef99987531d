pub mod stable_calculator;
pub mod weighted_calculator;

use crate::core::{PoolInfo, PoolState, SwapError, SwapResult};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use stable_calculator::StableCurve;
pub use weighted_calculator::WeightedCurve;

/// Curve-specific math shared by every pool family.
///
/// Implementations only see validated pools with positive reserves on both
/// sides of the trade. Fees, flooring and post-trade bookkeeping are applied
/// by [`PoolInfo::swap_exact_amount_in`].
pub trait CurveCalculator: Send + Sync {
    /// Marginal amount of `index_out` received per unit of `index_in`, before fees.
    fn marginal_price(&self, pool: &PoolInfo, index_in: usize, index_out: usize)
        -> SwapResult<Decimal>;

    /// Exact (unfloored) output for an input that has already paid its fee.
    fn calculate_out_amount(
        &self,
        pool: &PoolInfo,
        index_in: usize,
        index_out: usize,
        amount_in_after_fee: Decimal,
    ) -> SwapResult<Decimal>;
}

/// Result of simulating one swap through one pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub amount_out: u128,
    /// Realized out-per-in price.
    pub effective_price: Decimal,
    /// Fee charged, in input-token base units.
    pub fee_amount: u128,
    /// Fee-inclusive out-per-in spot price before the trade.
    pub spot_price_before: Decimal,
    /// Fee-inclusive out-per-in spot price at post-trade reserves.
    pub spot_price_after: Decimal,
}

impl PoolInfo {
    fn calculator(&self) -> &'static dyn CurveCalculator {
        match self.pool_state {
            PoolState::Weighted => &WeightedCurve,
            PoolState::Stable { .. } => &StableCurve,
        }
    }

    fn resolve_pair(&self, token_in: &str, token_out: &str) -> SwapResult<(usize, usize)> {
        self.validate().map_err(SwapError::InvalidPoolState)?;

        if token_in == token_out {
            return Err(SwapError::InvalidPoolState(format!(
                "cannot swap {} for itself in pool {}",
                token_in, self.id
            )));
        }

        // The stable invariant involves every reserve, not just the traded pair.
        if matches!(self.pool_state, PoolState::Stable { .. })
            && self.assets.iter().any(|asset| asset.amount == 0)
        {
            return Err(SwapError::insufficient_liquidity(&self.id, token_in, token_out));
        }

        match (self.asset_index(token_in), self.asset_index(token_out)) {
            (Some(index_in), Some(index_out))
                if self.assets[index_in].amount > 0 && self.assets[index_out].amount > 0 =>
            {
                Ok((index_in, index_out))
            }
            _ => Err(SwapError::insufficient_liquidity(&self.id, token_in, token_out)),
        }
    }

    /// Out-per-in spot price with this pool's swap fee applied on the input side.
    ///
    /// Because the fee is charged on whichever side is the input,
    /// `spot_price(a, b) * spot_price(b, a) == (1 - fee)^2`.
    pub fn spot_price(&self, token_in: &str, token_out: &str) -> SwapResult<Decimal> {
        self.spot_price_with_fee(token_in, token_out, self.swap_fee)
    }

    pub fn spot_price_with_fee(
        &self,
        token_in: &str,
        token_out: &str,
        swap_fee: Decimal,
    ) -> SwapResult<Decimal> {
        let (index_in, index_out) = self.resolve_pair(token_in, token_out)?;
        let marginal = self.calculator().marginal_price(self, index_in, index_out)?;
        marginal
            .checked_mul(Decimal::ONE - swap_fee)
            .ok_or(SwapError::MathOverflow)
    }

    pub fn swap_exact_amount_in(
        &self,
        token_in: &str,
        amount_in: u128,
        token_out: &str,
    ) -> SwapResult<SwapOutcome> {
        self.swap_exact_amount_in_with_fee(token_in, amount_in, token_out, self.swap_fee)
    }

    /// Simulates a swap charging `swap_fee` instead of the pool's own rate.
    pub fn swap_exact_amount_in_with_fee(
        &self,
        token_in: &str,
        amount_in: u128,
        token_out: &str,
        swap_fee: Decimal,
    ) -> SwapResult<SwapOutcome> {
        let (index_in, index_out) = self.resolve_pair(token_in, token_out)?;
        let calculator = self.calculator();
        let fee_multiplier = Decimal::ONE - swap_fee;

        let spot_price_before = calculator
            .marginal_price(self, index_in, index_out)?
            .checked_mul(fee_multiplier)
            .ok_or(SwapError::MathOverflow)?;

        if amount_in == 0 {
            return Ok(SwapOutcome {
                amount_out: 0,
                effective_price: spot_price_before,
                fee_amount: 0,
                spot_price_before,
                spot_price_after: spot_price_before,
            });
        }

        let amount_in_dec = to_decimal(amount_in)?;
        let fee_amount = floor_to_u128(
            amount_in_dec
                .checked_mul(swap_fee)
                .ok_or(SwapError::MathOverflow)?,
        )?;
        let amount_in_after_fee = amount_in_dec
            .checked_mul(fee_multiplier)
            .ok_or(SwapError::MathOverflow)?;

        let reserve_out = self.assets[index_out].amount;
        let exact_out =
            calculator.calculate_out_amount(self, index_in, index_out, amount_in_after_fee)?;
        // The output reserve can never be fully drained.
        let amount_out = floor_to_u128(exact_out.max(Decimal::ZERO))?.min(reserve_out - 1);

        if amount_out == 0 {
            return Err(SwapError::insufficient_liquidity(&self.id, token_in, token_out));
        }

        let effective_price = to_decimal(amount_out)?
            .checked_div(amount_in_dec)
            .ok_or(SwapError::MathOverflow)?;

        let mut after = self.clone();
        after.assets[index_in].amount = after.assets[index_in]
            .amount
            .checked_add(amount_in)
            .ok_or(SwapError::MathOverflow)?;
        after.assets[index_out].amount = reserve_out - amount_out;
        let spot_price_after = calculator
            .marginal_price(&after, index_in, index_out)?
            .checked_mul(fee_multiplier)
            .ok_or(SwapError::MathOverflow)?;

        Ok(SwapOutcome {
            amount_out,
            effective_price,
            fee_amount,
            spot_price_before,
            spot_price_after,
        })
    }
}

pub(crate) fn to_decimal(amount: u128) -> SwapResult<Decimal> {
    Decimal::from_u128(amount).ok_or(SwapError::MathOverflow)
}

pub(crate) fn floor_to_u128(value: Decimal) -> SwapResult<u128> {
    value.floor().to_u128().ok_or(SwapError::MathOverflow)
}
