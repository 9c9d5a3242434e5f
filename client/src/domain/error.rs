//! Store-level error taxonomy.
//!
//! These errors are what store operations return to the UI layer. They are
//! transport agnostic: the HTTP adapter's [`ApiError`](super::ports::ApiError)
//! is folded into this taxonomy at the store boundary, with the
//! operation-specific variants (`Auth`, `Registration`, `Verification`,
//! `Search`) chosen by the store that issued the call.

use super::ports::ApiError;

/// Failure surfaced by a store operation.
///
/// Every mutating store operation records the rendered message in its
/// `last_error` slot *and* returns the error, so a global observer and the
/// immediate caller can both react.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Login or session bootstrap failed.
    #[error("authentication failed: {message}")]
    Auth {
        /// Message extracted from the response, or a generic fallback.
        message: String,
    },
    /// Account registration failed.
    #[error("registration failed: {message}")]
    Registration {
        /// Message extracted from the response, or a generic fallback.
        message: String,
    },
    /// OTP verification failed.
    #[error("verification failed: {message}")]
    Verification {
        /// Message extracted from the response, or a generic fallback.
        message: String,
    },
    /// An authorised action was attempted without a bearer token.
    #[error("action requires an authenticated session")]
    Unauthorized,
    /// Recipe name search failed (other than the 404-as-empty case).
    #[error("search failed: {message}")]
    Search {
        /// Message extracted from the response, or a generic fallback.
        message: String,
    },
    /// Client-side input validation failed; no network call was made.
    #[error("invalid input: {message}")]
    Validation {
        /// Description of the offending field.
        message: String,
    },
    /// The backend was unreachable or answered with a failure status.
    #[error("network failure: {message}")]
    Network {
        /// Transport diagnostics or the server's message field.
        message: String,
    },
    /// The backend answered 2xx but the body could not be decoded.
    #[error("server response could not be decoded: {message}")]
    Decode {
        /// Decode diagnostics including a truncated body excerpt.
        message: String,
    },
    /// Durable local persistence failed.
    #[error("persistence failure: {message}")]
    Persistence {
        /// Adapter diagnostics.
        message: String,
    },
}

impl StoreError {
    /// Convenience constructor for [`StoreError::Auth`].
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`StoreError::Registration`].
    pub fn registration(message: impl Into<String>) -> Self {
        Self::Registration {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`StoreError::Verification`].
    pub fn verification(message: impl Into<String>) -> Self {
        Self::Verification {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`StoreError::Search`].
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`StoreError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`StoreError::Persistence`].
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }
}

impl From<ApiError> for StoreError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Decode { message } => Self::Decode { message },
            ApiError::Transport { message } | ApiError::Timeout { message } => {
                Self::Network { message }
            }
            ApiError::Status { message, .. } => Self::Network { message },
        }
    }
}
