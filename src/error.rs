//! Error types for Ethereum gateway operations.

use thiserror::Error;

/// Errors produced while talking to an Ethereum JSON-RPC endpoint or while
/// interpreting its responses.
#[derive(Debug, Error)]
pub enum EthError {
    /// Transport-level failure from the HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Human-readable message from the endpoint.
        message: String,
    },

    /// A response did not have the shape we expect.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what failed to parse.
        message: String,
    },

    /// Invalid user input (malformed address or hash).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EthError {
    /// Create a new parse error with the given message.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let parse_err = EthError::parse("missing field 'result'");
        assert_eq!(
            format!("{}", parse_err),
            "Parse error: missing field 'result'"
        );

        let rpc_err = EthError::Rpc {
            code: -32602,
            message: "invalid argument".to_string(),
        };
        assert_eq!(format!("{}", rpc_err), "RPC error -32602: invalid argument");

        let input_err = EthError::invalid_input("not a hex address");
        assert_eq!(format!("{}", input_err), "Invalid input: not a hex address");
    }

    #[test]
    fn test_parse_error_creation() {
        let err = EthError::parse("bad quantity");
        match err {
            EthError::Parse { message } => assert_eq!(message, "bad quantity"),
            _ => panic!("Expected Parse variant"),
        }
    }
}
