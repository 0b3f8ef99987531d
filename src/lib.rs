pub mod cli;
pub mod core;
pub mod discovery;
pub mod quotes;
pub mod routing;
pub mod selection;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{
    Config, IncentiveContext, OutGivenInRequest, PoolAsset, PoolInfo, PoolState, PoolType,
    Route, RouteHop, RouteLimits, SwapError, SwapResult, TokenOutByTokenInResult,
};
pub use discovery::{PoolGraph, PoolLoader, RouteDiscovery};
pub use routing::{
    AsyncRouteGenerator, ChannelDelegate, QuoteBook, RouteGenerator, RouteOutcome, RouteQuote,
    SyncRouteGenerator, TokenOutGivenInRouteDelegate,
};
pub use selection::QuoteCalculator;
