use thiserror::Error;

/// Failures from platform API calls.
///
/// Only two kinds matter to the UI: transport trouble (connection failure,
/// bad status, unreadable body) and an application-level rejection (HTTP
/// success but the body's success flag is false). Handlers map the first to a
/// fixed fallback notice and the second to the server's message when one was
/// sent.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status_code}: {message}")]
    Status { status_code: u16, message: String },

    #[error("unreadable response: {0}")]
    Decode(String),

    #[error("request was not accepted")]
    Rejected { message: Option<String> },
}

impl ApiError {
    /// True when the server accepted the request but declined it.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }

    /// Server-provided rejection text, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }
}

/// Result type for platform API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_carries_server_message() {
        let err = ApiError::Rejected { message: Some("Maximum attempts exceeded".to_string()) };
        assert!(err.is_rejection());
        assert_eq!(err.server_message(), Some("Maximum attempts exceeded"));
    }

    #[test]
    fn test_rejection_without_message() {
        let err = ApiError::Rejected { message: None };
        assert!(err.is_rejection());
        assert_eq!(err.server_message(), None);
        assert_eq!(err.to_string(), "request was not accepted");
    }

    #[test]
    fn test_status_error_is_transport_kind() {
        let err = ApiError::Status { status_code: 502, message: "bad gateway".to_string() };
        assert!(!err.is_rejection());
        assert_eq!(err.server_message(), None);
        assert!(err.to_string().contains("502"));
    }
}
