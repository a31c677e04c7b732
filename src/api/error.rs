use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single backend request.
///
/// Cloneable so it can ride inside UI events; the `Display` text is what ends
/// up in a view's error banner.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Session expired, please log in again")]
    Unauthorized,

    #[error("Not logged in")]
    SessionEnded,

    #[error("Request rejected ({status}): {body}")]
    Client { status: u16, body: String },

    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to save session: {0}")]
    Storage(String),
}

impl ApiError {
    /// Classifies a non-success status code.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized
        } else if status.is_server_error() {
            ApiError::Server {
                status: status.as_u16(),
                body,
            }
        } else {
            ApiError::Client {
                status: status.as_u16(),
                body,
            }
        }
    }

    /// Network and 5xx failures may succeed on a later attempt; nothing retries
    /// automatically, this only drives the wording shown to the operator.
    pub fn is_retriable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Server { .. })
    }

    /// The stored credentials are gone and the operator has to log in again.
    pub fn ends_session(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::SessionEnded)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status, err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            ApiError::Unauthorized
        );
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "missing".into()),
            ApiError::Client { status: 404, .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, String::new()),
            ApiError::Server { status: 502, .. }
        ));
    }

    #[test]
    fn test_retriable_split() {
        assert!(ApiError::Network("connection refused".into()).is_retriable());
        assert!(
            ApiError::Server {
                status: 500,
                body: String::new()
            }
            .is_retriable()
        );
        assert!(
            !ApiError::Client {
                status: 400,
                body: "{\"tipo\":[\"invalid\"]}".into()
            }
            .is_retriable()
        );
        assert!(!ApiError::Unauthorized.is_retriable());
    }

    #[test]
    fn test_session_ending_errors() {
        assert!(ApiError::Unauthorized.ends_session());
        assert!(ApiError::SessionEnded.ends_session());
        assert!(!ApiError::Network("timeout".into()).ends_session());
    }
}
