//! Error types for conversion-client

use thiserror::Error;

/// Errors that can occur while talking to the conversion service
#[derive(Error, Debug)]
pub enum ClientError {
    /// Service base URL missing or unusable
    #[error("Conversion service is not configured: {0}")]
    NotConfigured(String),

    /// HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Setup(String),

    /// Connection refused, DNS failure, reset, ...
    #[error("Conversion service unreachable: {0}")]
    Transport(String),

    /// Request exceeded the configured timeout
    #[error("Conversion service timed out")]
    Timeout,

    /// Non-2xx response
    #[error("Conversion service returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the response body, or the raw body
        message: String,
    },

    /// 2xx response whose body did not match the expected shape
    #[error("Invalid response from conversion service: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Whether a repeated attempt could succeed.
    ///
    /// Only transport-level failures and server-side (5xx) statuses qualify;
    /// a 4xx means the service rejected the lookup itself.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) | ClientError::Timeout => true,
            ClientError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether the service could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Timeout)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::Transport("connection reset".into()).is_retryable());
        assert!(ClientError::Status {
            status: 503,
            message: "busy".into()
        }
        .is_retryable());
        assert!(!ClientError::Status {
            status: 400,
            message: "Points must be between 0 and 1400".into()
        }
        .is_retryable());
        assert!(!ClientError::InvalidResponse("missing field".into()).is_retryable());
    }

    #[test]
    fn test_status_display_includes_message() {
        let err = ClientError::Status {
            status: 400,
            message: "Error calculating points".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("Error calculating points"));
    }
}
