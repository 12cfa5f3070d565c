//! Error types for the marketplace admin library.

use crate::auth::AccessDenial;
use crate::validation::FieldErrors;

/// All errors that can occur when using the admin client.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The HTTP transport failed (connection, TLS, body read).
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, or the raw body.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Query cache backend failed.
    #[error("cache error: {0}")]
    Cache(Box<dyn core::error::Error + Send + Sync>),

    /// No session token was provided.
    #[error("no session token provided")]
    MissingToken,

    /// The session is not allowed to use the admin console.
    #[error("access denied: {0}")]
    Unauthorized(AccessDenial),

    /// Client-side form validation failed.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AdminError>;

impl AdminError {
    /// Returns the HTTP status code when the error came from the API.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match *self {
            Self::Api { status, .. } => Some(status),
            #[cfg(any(feature = "async", feature = "blocking"))]
            Self::Http(_) => None,
            Self::Serialization(_)
            | Self::Cache(_)
            | Self::MissingToken
            | Self::Unauthorized(_)
            | Self::Validation(_)
            | Self::Config(_) => None,
        }
    }
}

impl From<FieldErrors> for AdminError {
    #[inline]
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<AccessDenial> for AdminError {
    #[inline]
    fn from(denial: AccessDenial) -> Self {
        Self::Unauthorized(denial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_serde_json() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = AdminError::from(serde_err);
        assert!(matches!(err, AdminError::Serialization(_)));
        assert!(err.to_string().contains("serialization error"));
    }

    #[test]
    fn api_error_display_and_status() {
        let err = AdminError::Api {
            status: 500,
            message: "boom".to_owned(),
        };
        assert_eq!(err.status(), Some(500));
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn cache_error_display() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = AdminError::Cache(Box::new(inner));
        assert!(err.to_string().contains("cache error"));
        assert!(err.to_string().contains("file missing"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn unauthorized_from_denial() {
        let err = AdminError::from(AccessDenial::NotAdmin);
        assert!(matches!(err, AdminError::Unauthorized(AccessDenial::NotAdmin)));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AdminError>();
    }
}
