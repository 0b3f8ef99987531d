use crate::core::{PoolInfo, SwapError, SwapResult};
use crate::quotes::{to_decimal, CurveCalculator};
use log::debug;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Weighted pool calculator
/// Generalized constant product: prod(B_i ^ W_i) = k
pub struct WeightedCurve;

impl WeightedCurve {
    fn balances(
        pool: &PoolInfo,
        index_in: usize,
        index_out: usize,
    ) -> SwapResult<(Decimal, Decimal, Decimal, Decimal)> {
        let asset_in = &pool.assets[index_in];
        let asset_out = &pool.assets[index_out];
        Ok((
            to_decimal(asset_in.amount)?,
            asset_in.effective_weight(),
            to_decimal(asset_out.amount)?,
            asset_out.effective_weight(),
        ))
    }
}

impl CurveCalculator for WeightedCurve {
    /// (B_out / W_out) / (B_in / W_in)
    fn marginal_price(
        &self,
        pool: &PoolInfo,
        index_in: usize,
        index_out: usize,
    ) -> SwapResult<Decimal> {
        let (balance_in, weight_in, balance_out, weight_out) =
            Self::balances(pool, index_in, index_out)?;

        let reserve_ratio = balance_out
            .checked_div(balance_in)
            .ok_or(SwapError::MathOverflow)?;
        let weight_ratio = weight_in
            .checked_div(weight_out)
            .ok_or(SwapError::MathOverflow)?;

        reserve_ratio
            .checked_mul(weight_ratio)
            .ok_or(SwapError::MathOverflow)
    }

    /// B_out * (1 - (B_in / (B_in + A_in)) ^ (W_in / W_out))
    fn calculate_out_amount(
        &self,
        pool: &PoolInfo,
        index_in: usize,
        index_out: usize,
        amount_in_after_fee: Decimal,
    ) -> SwapResult<Decimal> {
        let (balance_in, weight_in, balance_out, weight_out) =
            Self::balances(pool, index_in, index_out)?;

        let new_balance_in = balance_in
            .checked_add(amount_in_after_fee)
            .ok_or(SwapError::MathOverflow)?;

        let share_out = if weight_in == weight_out {
            // Plain x * y = k; skips the fractional power.
            amount_in_after_fee
                .checked_div(new_balance_in)
                .ok_or(SwapError::MathOverflow)?
        } else {
            let base = balance_in
                .checked_div(new_balance_in)
                .ok_or(SwapError::MathOverflow)?;
            let exponent = weight_in
                .checked_div(weight_out)
                .ok_or(SwapError::MathOverflow)?;
            let remaining = base.checked_powd(exponent).ok_or(SwapError::MathOverflow)?;
            Decimal::ONE - remaining
        };

        debug!(
            "Weighted pool {}: in={} w_in={} out_reserve={} w_out={} share_out={}",
            pool.id, amount_in_after_fee, weight_in, balance_out, weight_out, share_out
        );

        balance_out
            .checked_mul(share_out)
            .ok_or(SwapError::MathOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PoolAsset;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_constant_product_output() {
        let pool = PoolInfo::weighted(
            "1",
            vec![PoolAsset::new("uatom", 1_000_000), PoolAsset::new("uosmo", 1_000_000)],
            Decimal::ZERO,
        );

        // 1_000_000 * 1_000 / 1_001_000 = 999.000999...
        let out = WeightedCurve
            .calculate_out_amount(&pool, 0, 1, Decimal::from(1_000u64))
            .unwrap();
        assert_eq!(out.floor(), Decimal::from(999u64));
    }

    #[test]
    fn test_weighted_marginal_price() {
        // 80/20 pool holding 4x the value on the heavy side prices 1:1.
        let pool = PoolInfo::weighted(
            "2",
            vec![
                PoolAsset::weighted("uosmo", 4_000_000, dec("0.8")),
                PoolAsset::weighted("uatom", 1_000_000, dec("0.2")),
            ],
            Decimal::ZERO,
        );

        assert_eq!(WeightedCurve.marginal_price(&pool, 0, 1).unwrap(), Decimal::ONE);
        assert_eq!(WeightedCurve.marginal_price(&pool, 1, 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_heavier_input_weight_gives_more_output() {
        let balanced = PoolInfo::weighted(
            "3",
            vec![PoolAsset::new("uosmo", 1_000_000), PoolAsset::new("uatom", 1_000_000)],
            Decimal::ZERO,
        );
        let skewed = PoolInfo::weighted(
            "4",
            vec![
                PoolAsset::weighted("uosmo", 1_000_000, dec("2")),
                PoolAsset::weighted("uatom", 1_000_000, dec("1")),
            ],
            Decimal::ZERO,
        );

        let amount = Decimal::from(10_000u64);
        let balanced_out = WeightedCurve
            .calculate_out_amount(&balanced, 0, 1, amount)
            .unwrap();
        let skewed_out = WeightedCurve
            .calculate_out_amount(&skewed, 0, 1, amount)
            .unwrap();

        assert!(skewed_out > balanced_out);
        // Bounded by the marginal price of 2.
        assert!(skewed_out < Decimal::from(20_000u64));
    }
}
