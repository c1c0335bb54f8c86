//! Transport error types and machine-readable error codes

use std::time::Duration;

use thiserror::Error;

/// Transport errors for cloud appliance API operations
///
/// This enum abstracts the HTTP/SSE plumbing into domain-level failure
/// classes. Server-reported failures carry the machine-readable error key
/// from the response body, which callers classify via [`ApiError::code`].
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Network communication error
    ///
    /// Connection timeouts, DNS failures, or the API host being unreachable.
    #[error("Network error: {0}")]
    Network(String),

    /// Response parsing error
    ///
    /// The server returned a response that could not be decoded into the
    /// expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error reported by the appliance API server
    ///
    /// Carries the machine-readable error key (e.g.
    /// `SDK.Error.NoProgramActive`) and a human-readable description.
    #[error("Server error {key}: {description}")]
    Server { key: String, description: String },

    /// Request was rate limited by the server
    #[error("Rate limited, retry after {0:?}")]
    RateLimited(Duration),
}

impl ApiError {
    /// Create a server error from a wire error key and description
    pub fn server(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Server {
            key: key.into(),
            description: description.into(),
        }
    }

    /// Classify the server error key, if this is a server error
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Server { key, .. } => Some(ErrorCode::from_key(key)),
            _ => None,
        }
    }
}

/// Classified server error codes
///
/// The variants the engine treats specially; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// No program is currently selected
    NoProgramSelected,
    /// No program is currently active
    NoProgramActive,
    /// Operation not permitted in the appliance's current operation state
    WrongOperationState,
    /// The requested setting is not supported by this appliance
    UnsupportedSetting,
    /// The requested operation is not supported by this appliance
    UnsupportedOperation,
    /// Any other server-reported error
    Other,
}

impl ErrorCode {
    /// Parse a wire error key into a classified code
    pub fn from_key(key: &str) -> Self {
        match key {
            "SDK.Error.NoProgramSelected" => Self::NoProgramSelected,
            "SDK.Error.NoProgramActive" => Self::NoProgramActive,
            "SDK.Error.WrongOperationState" => Self::WrongOperationState,
            "SDK.Error.UnsupportedSetting" => Self::UnsupportedSetting,
            "SDK.Error.UnsupportedOperation" => Self::UnsupportedOperation,
            _ => Self::Other,
        }
    }
}

/// Type alias for results that can return an `ApiError`
pub type Result<T> = std::result::Result<T, ApiError>;
