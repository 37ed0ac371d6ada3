//! Error types for the seller API client.
//!
//! # Design
//! Item-level rejections inside a batch are *not* errors: they come back as
//! data in `UpdateOutcome::errors`. Everything here aborts the call. The
//! library never branches on HTTP status, so a non-2xx response only shows up
//! as `Provider` (the body carried an error envelope) or `InvalidJson`.

use thiserror::Error;

/// Errors returned by `SellerClient` and its helpers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credentials missing or inconsistent at construction time.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required argument was not supplied.
    #[error("missing required argument `{0}`")]
    MissingArgument(&'static str),

    /// An item record could not be constructed.
    #[error("invalid item: {0}")]
    InvalidItem(String),

    /// The injected fetch facility failed before a response was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body was not valid JSON.
    #[error("response (HTTP {status}) is not valid JSON: {message}")]
    InvalidJson { status: u16, message: String },

    /// The response was JSON but not in the shape the operation expects.
    #[error("unexpected response shape: {0}")]
    UnexpectedResponseShape(String),

    /// The provider answered with an error envelope instead of a result.
    #[error("provider error (HTTP {status}) {code}: {message}")]
    Provider {
        status: u16,
        code: String,
        message: String,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_descriptive() {
        let err = ApiError::MissingArgument("filter");
        assert_eq!(err.to_string(), "missing required argument `filter`");

        let err = ApiError::InvalidJson {
            status: 502,
            message: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "response (HTTP 502) is not valid JSON: expected value"
        );
    }
}
