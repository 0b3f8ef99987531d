use crate::core::{SwapError, SwapResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    Weighted,
    Stable,
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolType::Weighted => write!(f, "Weighted"),
            PoolType::Stable => write!(f, "Stable"),
        }
    }
}

/// Curve family of a pool together with its curve-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoolState {
    /// Balancer-style weighted constant product. Asset weights live on the assets.
    Weighted,
    /// Curve-style StableSwap invariant.
    Stable { amp_factor: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolAsset {
    pub denom: String,
    /// Reserve in base units.
    pub amount: u128,
    #[serde(default)]
    pub weight: Option<Decimal>,
}

impl PoolAsset {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
            weight: None,
        }
    }

    pub fn weighted(denom: impl Into<String>, amount: u128, weight: Decimal) -> Self {
        Self {
            denom: denom.into(),
            amount,
            weight: Some(weight),
        }
    }

    /// Weight used by the weighted curve; unweighted assets count as 1.
    pub fn effective_weight(&self) -> Decimal {
        self.weight.unwrap_or(Decimal::ONE)
    }
}

/// Immutable snapshot of one liquidity pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub id: String,
    pub assets: Vec<PoolAsset>,
    pub swap_fee: Decimal,
    pub pool_state: PoolState,
}

impl PoolInfo {
    pub fn weighted(id: impl Into<String>, assets: Vec<PoolAsset>, swap_fee: Decimal) -> Self {
        Self {
            id: id.into(),
            assets,
            swap_fee,
            pool_state: PoolState::Weighted,
        }
    }

    pub fn stable(
        id: impl Into<String>,
        assets: Vec<PoolAsset>,
        swap_fee: Decimal,
        amp_factor: u64,
    ) -> Self {
        Self {
            id: id.into(),
            assets,
            swap_fee,
            pool_state: PoolState::Stable { amp_factor },
        }
    }

    pub fn pool_type(&self) -> PoolType {
        match self.pool_state {
            PoolState::Weighted => PoolType::Weighted,
            PoolState::Stable { .. } => PoolType::Stable,
        }
    }

    pub fn asset_index(&self, denom: &str) -> Option<usize> {
        self.assets.iter().position(|asset| asset.denom == denom)
    }

    pub fn has_denom(&self, denom: &str) -> bool {
        self.asset_index(denom).is_some()
    }

    pub fn denoms(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|asset| asset.denom.as_str())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.assets.len() < 2 {
            return Err(format!("pool {} has fewer than two assets", self.id));
        }

        let mut seen = BTreeSet::new();
        for asset in &self.assets {
            if asset.denom.is_empty() {
                return Err(format!("pool {} has an asset with an empty denom", self.id));
            }
            if !seen.insert(asset.denom.as_str()) {
                return Err(format!("pool {} lists {} twice", self.id, asset.denom));
            }
            if let Some(weight) = asset.weight {
                if weight <= Decimal::ZERO {
                    return Err(format!(
                        "pool {} has non-positive weight for {}",
                        self.id, asset.denom
                    ));
                }
            }
        }

        if self.swap_fee < Decimal::ZERO || self.swap_fee >= Decimal::ONE {
            return Err(format!(
                "pool {} swap fee {} outside [0, 1)",
                self.id, self.swap_fee
            ));
        }

        if let PoolState::Stable { amp_factor: 0 } = self.pool_state {
            return Err(format!("pool {} has zero amplification", self.id));
        }

        Ok(())
    }
}

/// Incentivized pools and the reward denom that unlocks the fee discount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncentiveContext {
    pub pool_ids: BTreeSet<String>,
    pub base_denom: Option<String>,
}

impl IncentiveContext {
    pub fn new<I, S>(pool_ids: I, base_denom: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pool_ids: pool_ids.into_iter().map(Into::into).collect(),
            base_denom: Some(base_denom.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pool_ids.is_empty() || self.base_denom.is_none()
    }

    pub fn is_incentivized(&self, pool_id: &str) -> bool {
        self.pool_ids.contains(pool_id)
    }

    /// A hop earns the discount when its pool is incentivized and one of
    /// its legs is the incentive base denom.
    pub fn discounts(&self, hop: &RouteHop) -> bool {
        match &self.base_denom {
            Some(base) => {
                self.is_incentivized(&hop.pool_id)
                    && (hop.token_in_denom == *base || hop.token_out_denom == *base)
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteHop {
    pub pool_id: String,
    pub token_in_denom: String,
    pub token_out_denom: String,
}

impl RouteHop {
    pub fn new(
        pool_id: impl Into<String>,
        token_in_denom: impl Into<String>,
        token_out_denom: impl Into<String>,
    ) -> Self {
        Self {
            pool_id: pool_id.into(),
            token_in_denom: token_in_denom.into(),
            token_out_denom: token_out_denom.into(),
        }
    }
}

/// Ordered chain of pool hops from `token_in_denom` to `token_out_denom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub token_in_denom: String,
    pub token_out_denom: String,
    pub hops: Vec<RouteHop>,
}

impl Route {
    pub fn new(
        token_in_denom: impl Into<String>,
        token_out_denom: impl Into<String>,
        hops: Vec<RouteHop>,
    ) -> Self {
        Self {
            token_in_denom: token_in_denom.into(),
            token_out_denom: token_out_denom.into(),
            hops,
        }
    }

    /// Route with no hops, delivered for zero-amount requests that have no path.
    pub fn empty(token_in_denom: impl Into<String>, token_out_denom: impl Into<String>) -> Self {
        Self::new(token_in_denom, token_out_denom, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn pool_ids(&self) -> Vec<&str> {
        self.hops.iter().map(|hop| hop.pool_id.as_str()).collect()
    }

    /// Checks endpoint and hop-to-hop denom chaining.
    pub fn is_well_formed(&self) -> bool {
        let (Some(first), Some(last)) = (self.hops.first(), self.hops.last()) else {
            return true;
        };

        first.token_in_denom == self.token_in_denom
            && last.token_out_denom == self.token_out_denom
            && self
                .hops
                .windows(2)
                .all(|pair| pair[0].token_out_denom == pair[1].token_in_denom)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token_in_denom)?;
        for hop in &self.hops {
            write!(f, " -[{}]-> {}", hop.pool_id, hop.token_out_denom)?;
        }
        Ok(())
    }
}

/// Quote request: how much `base_denom_out` for `base_amount_in` of `base_denom_in`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutGivenInRequest {
    pub base_denom_in: String,
    pub base_amount_in: u128,
    pub base_denom_out: String,
}

impl OutGivenInRequest {
    pub fn new(
        base_denom_in: impl Into<String>,
        base_amount_in: u128,
        base_denom_out: impl Into<String>,
    ) -> Self {
        Self {
            base_denom_in: base_denom_in.into(),
            base_amount_in,
            base_denom_out: base_denom_out.into(),
        }
    }

    /// One whole input token (`10^decimals` base units), for quoting the
    /// displayed exchange rate of a pair.
    pub fn whole_token(
        base_denom_in: impl Into<String>,
        decimals: u32,
        base_denom_out: impl Into<String>,
    ) -> SwapResult<Self> {
        let amount = 10u128.checked_pow(decimals).ok_or_else(|| {
            SwapError::InvalidAmount(format!("10^{} does not fit in u128", decimals))
        })?;
        Ok(Self::new(base_denom_in, amount, base_denom_out))
    }

    pub fn key(&self) -> RequestKey {
        RequestKey {
            denom_in: self.base_denom_in.clone(),
            amount_in: self.base_amount_in,
            denom_out: self.base_denom_out.clone(),
        }
    }
}

/// Correlates delivered outcomes with the request that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestKey {
    denom_in: String,
    amount_in: u128,
    denom_out: String,
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.denom_in, self.amount_in, self.denom_out)
    }
}

/// Share of the input amount sent down one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitLeg {
    pub route: Route,
    pub amount_in: u128,
    pub amount_out: u128,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenOutByTokenInResult {
    pub amount: u128,
    pub before_spot_price_in_over_out: Decimal,
    pub before_spot_price_out_over_in: Decimal,
    pub before_spot_price_without_swap_fee_out_over_in: Decimal,
    pub after_spot_price_in_over_out: Decimal,
    pub after_spot_price_out_over_in: Decimal,
    pub effective_price_in_over_out: Decimal,
    pub effective_price_out_over_in: Decimal,
    pub swap_fee: Decimal,
    pub token_in_fee_amount: u128,
    pub price_impact: Decimal,
    pub multi_hop_incentive_discount: bool,
    pub split: Vec<SplitLeg>,
}

impl TokenOutByTokenInResult {
    pub fn zero() -> Self {
        Self {
            amount: 0,
            before_spot_price_in_over_out: Decimal::ZERO,
            before_spot_price_out_over_in: Decimal::ZERO,
            before_spot_price_without_swap_fee_out_over_in: Decimal::ZERO,
            after_spot_price_in_over_out: Decimal::ZERO,
            after_spot_price_out_over_in: Decimal::ZERO,
            effective_price_in_over_out: Decimal::ZERO,
            effective_price_out_over_in: Decimal::ZERO,
            swap_fee: Decimal::ZERO,
            token_in_fee_amount: 0,
            price_impact: Decimal::ZERO,
            multi_hop_incentive_discount: false,
            split: Vec::new(),
        }
    }
}
