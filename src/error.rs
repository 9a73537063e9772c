//! Error taxonomy for the capture pipeline.
//!
//! Fatal conditions (`InvalidSourceData`, `UpstreamUnavailable`) abort the
//! run before any publish attempt. `MalformedIdentifier` is a per-record
//! condition: the normalizer that hits it skips the offending record and
//! continues with its siblings. Publish conflicts and failures are not
//! errors at all; they are collected as [`crate::publish::PublishOutcome`]
//! values and reported after the publish phase.

use thiserror::Error;

/// Main error type for the capture pipeline.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("malformed identifier '{identifier}': {reason}")]
    MalformedIdentifier { identifier: String, reason: String },

    #[error("invalid source data from {source}: {reason}")]
    InvalidSourceData { r#source: String, reason: String },

    #[error("upstream {service} returned no usable data")]
    UpstreamUnavailable { service: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for convenience
pub type CaptureResult<T> = Result<T, CaptureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CaptureError::MalformedIdentifier {
            identifier: "9x".to_string(),
            reason: "identifier must be rooted at a cabinet token".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed identifier '9x': identifier must be rooted at a cabinet token"
        );

        let err = CaptureError::UpstreamUnavailable {
            service: "switch discovery".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "upstream switch discovery returned no usable data"
        );
    }
}
