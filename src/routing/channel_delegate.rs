use crate::core::{OutGivenInRequest, Route, SwapError, SwapResult, TokenOutByTokenInResult};
use crate::routing::{RouteQuote, TokenOutGivenInRouteDelegate};
use log::debug;
use tokio::sync::mpsc;

/// One delivered outcome, as seen by a channel consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Quote {
        request: OutGivenInRequest,
        route: Route,
        result: TokenOutByTokenInResult,
    },
    Error {
        request: OutGivenInRequest,
        error: SwapError,
    },
}

impl RouteOutcome {
    pub fn request(&self) -> &OutGivenInRequest {
        match self {
            RouteOutcome::Quote { request, .. } | RouteOutcome::Error { request, .. } => request,
        }
    }

    pub fn into_result(self) -> SwapResult<RouteQuote> {
        match self {
            RouteOutcome::Quote { route, result, .. } => Ok(RouteQuote { route, result }),
            RouteOutcome::Error { error, .. } => Err(error),
        }
    }
}

/// Delegate that forwards outcomes into a tokio channel.
pub struct ChannelDelegate {
    sender: mpsc::UnboundedSender<RouteOutcome>,
}

impl ChannelDelegate {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RouteOutcome>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn forward(&self, outcome: RouteOutcome) {
        if self.sender.send(outcome).is_err() {
            debug!("Outcome receiver dropped");
        }
    }
}

impl TokenOutGivenInRouteDelegate for ChannelDelegate {
    fn receive_quote(
        &self,
        request: OutGivenInRequest,
        route: Route,
        result: TokenOutByTokenInResult,
    ) {
        self.forward(RouteOutcome::Quote {
            request,
            route,
            result,
        });
    }

    fn receive_error(&self, request: OutGivenInRequest, error: SwapError) {
        self.forward(RouteOutcome::Error { request, error });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_outcomes_arrive_in_delivery_order() {
        let (delegate, mut receiver) = ChannelDelegate::new();
        let first = OutGivenInRequest::new("uatom", 1, "uosmo");
        let second = OutGivenInRequest::new("uatom", 2, "uosmo");

        delegate.receive_error(first.clone(), SwapError::no_route("uatom", "uosmo"));
        delegate.receive_quote(
            second.clone(),
            Route::empty("uatom", "uosmo"),
            TokenOutByTokenInResult::zero(),
        );

        assert_eq!(receiver.recv().await.unwrap().request(), &first);
        assert_eq!(receiver.recv().await.unwrap().request(), &second);
    }

    #[test]
    fn test_closed_receiver_is_ignored() {
        let (delegate, receiver) = ChannelDelegate::new();
        drop(receiver);
        delegate.receive_error(
            OutGivenInRequest::new("uatom", 1, "uosmo"),
            SwapError::MathOverflow,
        );
    }
}
