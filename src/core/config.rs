use crate::core::{constants::*, error::SwapResult, SwapError};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub max_pools_in_route: usize,
    pub max_routes_per_request: usize,
    pub incentive_fee_discount: f64,
    pub split_granularity: u32,
    pub incentive_base_denom: String,
    pub pool_snapshot_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> SwapResult<Self> {
        Ok(Self {
            max_pools_in_route: env::var("MAX_POOLS_IN_ROUTE")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_MAX_POOLS_IN_ROUTE),
            max_routes_per_request: env::var("MAX_ROUTES_PER_REQUEST")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_MAX_ROUTES_PER_REQUEST),
            incentive_fee_discount: env::var("INCENTIVE_FEE_DISCOUNT")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_INCENTIVE_FEE_DISCOUNT),
            split_granularity: env::var("SPLIT_GRANULARITY")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_SPLIT_GRANULARITY),
            incentive_base_denom: env::var("INCENTIVE_BASE_DENOM")
                .unwrap_or_else(|_| DEFAULT_INCENTIVE_BASE_DENOM.to_string()),
            pool_snapshot_path: env::var("POOL_SNAPSHOT_PATH").ok().map(PathBuf::from),
        })
    }

    pub fn validate(&self) -> SwapResult<()> {
        if self.max_pools_in_route == 0 || self.max_pools_in_route > MAX_POOLS_IN_ROUTE_LIMIT {
            return Err(SwapError::ConfigError(format!(
                "Max pools in route must be between 1 and {}",
                MAX_POOLS_IN_ROUTE_LIMIT
            )));
        }

        if self.max_routes_per_request == 0
            || self.max_routes_per_request > MAX_ROUTES_PER_REQUEST_LIMIT
        {
            return Err(SwapError::ConfigError(format!(
                "Max routes per request must be between 1 and {}",
                MAX_ROUTES_PER_REQUEST_LIMIT
            )));
        }

        if !(0.0..=1.0).contains(&self.incentive_fee_discount) {
            return Err(SwapError::ConfigError(
                "Incentive fee discount must be between 0 and 1".to_string(),
            ));
        }

        if self.split_granularity == 0 || self.split_granularity > MAX_SPLIT_GRANULARITY {
            return Err(SwapError::ConfigError(format!(
                "Split granularity must be between 1 and {}",
                MAX_SPLIT_GRANULARITY
            )));
        }

        if self.incentive_base_denom.is_empty() {
            return Err(SwapError::ConfigError(
                "Incentive base denom cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Limits handed to route generators.
    pub fn route_limits(&self) -> SwapResult<RouteLimits> {
        self.validate()?;
        let incentive_fee_discount = Decimal::from_f64(self.incentive_fee_discount)
            .ok_or_else(|| SwapError::ConfigError("Invalid incentive fee discount".to_string()))?;

        Ok(RouteLimits {
            max_pools_in_route: self.max_pools_in_route,
            max_routes_per_request: self.max_routes_per_request,
            incentive_fee_discount,
            split_granularity: self.split_granularity,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_pools_in_route: DEFAULT_MAX_POOLS_IN_ROUTE,
            max_routes_per_request: DEFAULT_MAX_ROUTES_PER_REQUEST,
            incentive_fee_discount: DEFAULT_INCENTIVE_FEE_DISCOUNT,
            split_granularity: DEFAULT_SPLIT_GRANULARITY,
            incentive_base_denom: DEFAULT_INCENTIVE_BASE_DENOM.to_string(),
            pool_snapshot_path: None,
        }
    }
}

/// Search and allocation bounds applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteLimits {
    pub max_pools_in_route: usize,
    pub max_routes_per_request: usize,
    pub incentive_fee_discount: Decimal,
    pub split_granularity: u32,
}

impl RouteLimits {
    pub fn with_hops(mut self, max_pools_in_route: usize) -> Self {
        self.max_pools_in_route = max_pools_in_route;
        self
    }

    pub fn with_routes(mut self, max_routes_per_request: usize) -> Self {
        self.max_routes_per_request = max_routes_per_request;
        self
    }
}

impl Default for RouteLimits {
    fn default() -> Self {
        Self {
            max_pools_in_route: DEFAULT_MAX_POOLS_IN_ROUTE,
            max_routes_per_request: DEFAULT_MAX_ROUTES_PER_REQUEST,
            incentive_fee_discount: Decimal::new(5, 1),
            split_granularity: DEFAULT_SPLIT_GRANULARITY,
        }
    }
}
