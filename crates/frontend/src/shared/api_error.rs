//! Error type of the client layer
//!
//! Every store and request helper returns `Result<_, ApiError>`; views turn the
//! error into a message with `to_string()`. `Clone` lets a debounced call hand
//! the same failure to every waiting caller.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Request never reached the backend (DNS, CORS, connection refused...)
    #[error("Failed to fetch: {0}")]
    Network(String),

    /// Non-2xx status; `message` comes from the envelope when the body has one
    #[error("Server error {status}: {message}")]
    Http { status: u16, message: String },

    /// 401 from the backend: the token is missing or expired
    #[error("Unauthorized")]
    Unauthorized,

    /// 2xx response whose envelope carries `status: "error"`
    #[error("{0}")]
    Backend(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Stream error: {0}")]
    Stream(String),

    /// Caller aborted an in-flight streamed request
    #[error("Request aborted")]
    Aborted,
}

impl ApiError {
    pub fn decode(e: impl std::fmt::Display) -> Self {
        ApiError::Decode(e.to_string())
    }

    pub fn network(e: impl std::fmt::Debug) -> Self {
        ApiError::Network(format!("{e:?}"))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = ApiError::Http {
            status: 404,
            message: "spider not found".into(),
        };
        assert_eq!(e.to_string(), "Server error 404: spider not found");
        assert_eq!(ApiError::Backend("invalid id".into()).to_string(), "invalid id");
        assert!(ApiError::Unauthorized.is_unauthorized());
    }
}
