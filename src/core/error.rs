use thiserror::Error;

pub type SwapResult<T> = Result<T, SwapError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwapError {
    #[error("No route found from {token_in} to {token_out}")]
    NoRoute { token_in: String, token_out: String },

    #[error("Insufficient liquidity in pool {pool_id} for {token_in} -> {token_out}")]
    InsufficientLiquidity {
        pool_id: String,
        token_in: String,
        token_out: String,
    },

    #[error("Invalid pool state: {0}")]
    InvalidPoolState(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Math overflow in calculation")]
    MathOverflow,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl SwapError {
    pub fn no_route(token_in: &str, token_out: &str) -> Self {
        SwapError::NoRoute {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
        }
    }

    pub fn insufficient_liquidity(pool_id: &str, token_in: &str, token_out: &str) -> Self {
        SwapError::InsufficientLiquidity {
            pool_id: pool_id.to_string(),
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
        }
    }

    pub fn is_no_route(&self) -> bool {
        matches!(self, SwapError::NoRoute { .. })
    }

    pub fn is_insufficient_liquidity(&self) -> bool {
        matches!(self, SwapError::InsufficientLiquidity { .. })
    }
}

impl From<anyhow::Error> for SwapError {
    /// Keeps the whole context chain, outermost first.
    fn from(err: anyhow::Error) -> Self {
        SwapError::Other(format!("{:#}", err))
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        SwapError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for SwapError {
    fn from(err: std::io::Error) -> Self {
        SwapError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = SwapError::no_route("uatom", "uosmo");
        assert!(err.is_no_route());
        assert!(!err.is_insufficient_liquidity());
        assert_eq!(err.to_string(), "No route found from uatom to uosmo");

        let err = SwapError::insufficient_liquidity("7", "uatom", "uosmo");
        assert!(err.is_insufficient_liquidity());
        assert!(!err.is_no_route());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: SwapError = parse_err.into();
        assert!(matches!(err, SwapError::SerializationError(_)));
    }

    #[test]
    fn test_anyhow_context_is_preserved() {
        use anyhow::Context;

        let failed: SwapResult<()> = Err(SwapError::MathOverflow);
        let err: SwapError = failed.context("loading snapshot").unwrap_err().into();
        assert_eq!(
            err,
            SwapError::Other("loading snapshot: Math overflow in calculation".to_string())
        );
    }
}
