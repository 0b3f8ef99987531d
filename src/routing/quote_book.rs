use crate::core::{OutGivenInRequest, RequestKey, Route, SwapError, TokenOutByTokenInResult};
use crate::routing::{RouteQuote, TokenOutGivenInRouteDelegate};
use dashmap::DashMap;
use log::debug;

/// Which of the consumer's two outstanding questions a request answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteSlot {
    /// The amount the user actually typed.
    Trade,
    /// One whole input token, for the displayed exchange rate.
    SpotPrice,
}

/// Delegate that keeps the latest outcome for each current request.
///
/// Outcomes for requests no slot points at any more are stale and dropped.
#[derive(Default)]
pub struct QuoteBook {
    current: DashMap<QuoteSlot, RequestKey>,
    quotes: DashMap<RequestKey, RouteQuote>,
    errors: DashMap<RequestKey, SwapError>,
}

impl QuoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points `slot` at `request`; call before issuing the request.
    pub fn track(&self, slot: QuoteSlot, request: &OutGivenInRequest) {
        let key = request.key();
        if let Some(previous) = self.current.insert(slot, key.clone()) {
            if previous != key && !self.is_current(&previous) {
                self.quotes.remove(&previous);
                self.errors.remove(&previous);
            }
        }
    }

    fn is_current(&self, key: &RequestKey) -> bool {
        self.current.iter().any(|entry| entry.value() == key)
    }

    pub fn quote(&self, slot: QuoteSlot) -> Option<RouteQuote> {
        let key = self.current.get(&slot)?.clone();
        self.quotes.get(&key).map(|entry| entry.value().clone())
    }

    pub fn error(&self, slot: QuoteSlot) -> Option<SwapError> {
        let key = self.current.get(&slot)?.clone();
        self.errors.get(&key).map(|entry| entry.value().clone())
    }

    /// Number of stored quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl TokenOutGivenInRouteDelegate for QuoteBook {
    fn receive_quote(
        &self,
        request: OutGivenInRequest,
        route: Route,
        result: TokenOutByTokenInResult,
    ) {
        let key = request.key();
        if !self.is_current(&key) {
            debug!("Discarding stale quote for {}", key);
            return;
        }
        self.errors.remove(&key);
        self.quotes.insert(key.clone(), RouteQuote { route, result });
        // `track` may have moved the slot between the check and the insert.
        if !self.is_current(&key) {
            self.quotes.remove(&key);
        }
    }

    fn receive_error(&self, request: OutGivenInRequest, error: SwapError) {
        let key = request.key();
        self.quotes.remove(&key);
        if !self.is_current(&key) {
            debug!("Discarding stale error for {}: {}", key, error);
            return;
        }
        self.errors.insert(key.clone(), error);
        if !self.is_current(&key) {
            self.errors.remove(&key);
        }
    }
}
