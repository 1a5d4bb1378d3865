//! Error types for the relay client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the workflow API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the failed call, if the API answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if the API throttled the request
    ///
    /// The API signals secondary rate limits with 403 and primary ones with
    /// 403 or 429.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::ApiError { status: 429, .. } => true,
            Self::ApiError {
                status: 403,
                message,
            } => message.to_lowercase().contains("rate limit"),
            _ => false,
        }
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(ClientError::api_error(404, "Not Found").is_not_found());
        assert!(ClientError::api_error(429, "slow down").is_rate_limited());
        assert!(
            ClientError::api_error(403, "API rate limit exceeded for installation").is_rate_limited()
        );
        assert!(!ClientError::api_error(403, "Resource not accessible by integration").is_rate_limited());
        assert!(ClientError::api_error(502, "Bad Gateway").is_server_error());
        assert!(!ClientError::ParseError("bad".to_string()).is_server_error());
    }

    #[test]
    fn test_display() {
        let err = ClientError::api_error(422, "Unexpected inputs provided");
        assert_eq!(
            err.to_string(),
            "API error (status 422): Unexpected inputs provided"
        );
    }
}
