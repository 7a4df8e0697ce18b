use std::fmt;

/// Errors that can occur when talking to the chat backend.
///
/// Cloneable so a failed result can travel inside an `Action` back to the
/// controllers that display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read
    /// (timeout, DNS, connection refused).
    Network(String),
    /// The backend answered with a non-2xx status, or a 2xx response whose
    /// envelope carries an error `code`.
    Status { status: u16, message: String },
    /// The response body did not match any known payload shape.
    Decode(String),
    /// A required argument was missing before any request was issued.
    Validation(String),
}

impl ApiError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Status { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Decode(msg) => write!(f, "unexpected response: {msg}"),
            ApiError::Validation(msg) => write!(f, "invalid request: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
