use rust_decimal::Decimal;

// Route search limits
pub const DEFAULT_MAX_POOLS_IN_ROUTE: usize = 3;
pub const DEFAULT_MAX_ROUTES_PER_REQUEST: usize = 3;
pub const MAX_POOLS_IN_ROUTE_LIMIT: usize = 6;
pub const MAX_ROUTES_PER_REQUEST_LIMIT: usize = 10;

// Incentives
pub const DEFAULT_INCENTIVE_BASE_DENOM: &str = "uosmo";
/// Share of the swap fee waived on a hop through an incentivized pool
/// that trades the incentive base denom (0.5 = half fee).
pub const DEFAULT_INCENTIVE_FEE_DISCOUNT: f64 = 0.5;

// Split allocation grid
pub const DEFAULT_SPLIT_GRANULARITY: u32 = 20;
pub const MAX_SPLIT_GRANULARITY: u32 = 200;

// StableSwap Newton iteration
pub const STABLE_MAX_ITERATIONS: usize = 255;
/// Convergence threshold on reserves normalized to a unit total (1e-20).
pub const STABLE_CONVERGENCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 20);
