use crate::core::{Config, OutGivenInRequest, PoolInfo, RouteLimits, SwapError, SwapResult};
use crate::routing::{
    RouteGenerator, RouteQuote, RoutingSnapshot, RoutingState, TokenOutGivenInRouteDelegate,
};
use log::debug;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Route generator that moves every computation onto tokio's blocking pool.
///
/// The request's snapshot is captured when the request is issued. Outcomes are
/// delivered in completion order to the delegate registered at that moment.
pub struct AsyncRouteGenerator {
    state: Arc<RoutingState>,
    handle: Handle,
}

impl AsyncRouteGenerator {
    pub fn new(limits: RouteLimits, handle: Handle) -> Self {
        Self {
            state: Arc::new(RoutingState::new(limits)),
            handle,
        }
    }

    /// Binds to the runtime the caller is running on.
    pub fn from_config(config: &Config) -> SwapResult<Self> {
        let handle = Handle::try_current()
            .map_err(|e| SwapError::ConfigError(format!("No tokio runtime available: {}", e)))?;
        Ok(Self::new(config.route_limits()?, handle))
    }

    fn compute(
        &self,
        request: OutGivenInRequest,
    ) -> impl std::future::Future<Output = SwapResult<RouteQuote>> {
        let snapshot: Arc<RoutingSnapshot> = self.state.snapshot();
        let limits = self.state.limits();
        let task = self
            .handle
            .spawn_blocking(move || snapshot.quote(&request, &limits));

        async move {
            task.await.unwrap_or_else(|e| {
                Err(SwapError::Other(format!("Quote computation failed: {}", e)))
            })
        }
    }

    /// Future call shape of a request; bypasses the delegate.
    pub async fn quote_token_out_by_token_in(
        &self,
        request: &OutGivenInRequest,
    ) -> SwapResult<RouteQuote> {
        self.compute(request.clone()).await
    }

    /// Issues a request and returns the task that will deliver its outcome.
    pub fn spawn_request(&self, request: OutGivenInRequest) -> JoinHandle<()> {
        debug!("Dispatching {} to blocking pool", request.key());
        let computation = self.compute(request.clone());
        let state = self.state.clone();

        self.handle.spawn(async move {
            let outcome = computation.await;
            state.deliver(request, outcome);
        })
    }

    pub fn snapshot(&self) -> Arc<RoutingSnapshot> {
        self.state.snapshot()
    }
}

impl RouteGenerator for AsyncRouteGenerator {
    fn set_token_in_delegate(&self, delegate: Arc<dyn TokenOutGivenInRouteDelegate>) {
        self.state.set_delegate(delegate);
    }

    fn update_pools(&self, pools: Vec<PoolInfo>) {
        self.state.update_pools(pools);
    }

    fn update_incentives_info(&self, pool_ids: Vec<String>, incentive_base_denom: String) {
        self.state.update_incentives(pool_ids, incentive_base_denom);
    }

    fn request_token_out_by_token_in(&self, request: OutGivenInRequest) {
        drop(self.spawn_request(request));
    }
}
