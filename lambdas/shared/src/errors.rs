//! Error types for the TMB routes pipeline

use thiserror::Error;

/// Result type alias using the pipeline Error
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum Error {
    /// Secret store unreachable, secret missing or malformed
    #[error("Secret access error: {0}")]
    SecretAccess(String),

    /// Journey-planning API answered with a non-2xx status
    #[error("Upstream API returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Journey-planning API could not be reached
    #[error("Upstream request failed: {0}")]
    UpstreamRequest(String),

    /// Source document does not have the journey-plan shape
    #[error("Transform error: {0}")]
    Transform(String),

    /// Notification topic unreachable or unauthorized
    #[error("Publish error: {0}")]
    Publish(String),

    /// Object does not exist in the store
    #[error("Object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    /// Object store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Query coordinate is not a number or out of range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Environment configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns the error code for API responses and logs
    pub fn code(&self) -> &'static str {
        match self {
            Error::SecretAccess(_) => "secret_access_error",
            Error::Upstream { .. } => "upstream_error",
            Error::UpstreamRequest(_) => "upstream_error",
            Error::Transform(_) => "transform_error",
            Error::Publish(_) => "publish_error",
            Error::ObjectNotFound { .. } => "storage_error",
            Error::Storage(_) => "storage_error",
            Error::InvalidCoordinate(_) => "invalid_coordinate",
            Error::Config(_) => "configuration_error",
            Error::Serialization(_) => "serialization_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Returns the HTTP status code for this error
    ///
    /// Only upstream failures are distinguished; everything else is a 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Upstream { .. } | Error::UpstreamRequest(_) => 502,
            _ => 500,
        }
    }

    pub fn is_upstream(&self) -> bool {
        self.status_code() == 502
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_maps_to_bad_gateway() {
        let err = Error::Upstream {
            status: 404,
            body: "Not Found".into(),
        };
        assert_eq!(err.code(), "upstream_error");
        assert_eq!(err.status_code(), 502);
        assert!(err.is_upstream());
    }

    #[test]
    fn test_upstream_display_contains_status() {
        let err = Error::Upstream {
            status: 404,
            body: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "Upstream API returned status 404: Not Found");
    }

    #[test]
    fn test_other_errors_are_internal() {
        let errors = [
            Error::SecretAccess("ResourceNotFoundException".into()),
            Error::Transform("missing plan".into()),
            Error::Publish("AuthorizationError".into()),
            Error::Storage("timeout".into()),
            Error::InvalidCoordinate("work_lat=abc".into()),
        ];
        for err in errors {
            assert_eq!(err.status_code(), 500, "{err}");
            assert!(!err.is_upstream());
        }
    }

    #[test]
    fn test_object_not_found_display() {
        let err = Error::ObjectNotFound {
            bucket: "tmbinfo".into(),
            key: "logs/logs.txt".into(),
        };
        assert_eq!(err.to_string(), "Object not found: tmbinfo/logs/logs.txt");
        assert_eq!(err.code(), "storage_error");
    }
}
