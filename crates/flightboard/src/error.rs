//! Error types for flightboard.
//!
//! The aggregation engine never fails; everything here belongs to the layers
//! around it: configuration, the backend client, authentication and CLI input.

use thiserror::Error;

/// The main error type for flightboard operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Backend Errors ===
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an unexpected status.
    #[error("backend returned {status} for {endpoint}: {message}")]
    Api {
        /// Endpoint path that was requested.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Message from the response body, if any.
        message: String,
    },

    /// The configured backend URL is not usable.
    #[error("invalid backend URL '{url}': {message}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    // === Authentication Errors ===
    /// The backend rejected the supplied credentials.
    #[error("login rejected: {message}")]
    LoginRejected {
        /// Message returned by the backend.
        message: String,
    },

    /// No credentials were supplied on the command line or in configuration.
    #[error("no credentials configured; pass --username/--password or set [auth] in the config file")]
    MissingCredentials,

    // === Input Errors ===
    /// A date argument did not match `YYYY-MM-DD`.
    #[error("invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        input: String,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for flightboard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an error for an unexpected backend status.
    #[must_use]
    pub fn api(endpoint: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a login rejection error.
    #[must_use]
    pub fn login_rejected(message: impl Into<String>) -> Self {
        Self::LoginRejected {
            message: message.into(),
        }
    }

    /// Check if this error is an authentication problem.
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::LoginRejected { .. } | Self::MissingCredentials)
    }

    /// Check if this error means the backend could not be reached at all.
    #[must_use]
    pub fn is_backend_unavailable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_connect() || err.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDate {
            input: "19/10/2026".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid date '19/10/2026', expected YYYY-MM-DD"
        );

        let err = Error::login_rejected("Invalid username or password");
        assert_eq!(
            err.to_string(),
            "login rejected: Invalid username or password"
        );
    }

    #[test]
    fn test_is_auth_error() {
        assert!(Error::login_rejected("nope").is_auth_error());
        assert!(Error::MissingCredentials.is_auth_error());
        assert!(!Error::api("/api/login", 500, "").is_auth_error());
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::api("/api/arrivals", 500, "boom");
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("/api/arrivals"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_invalid_date_display() {
        let err = Error::InvalidDate {
            input: "19/10/2026".to_string(),
        };
        assert!(err.to_string().contains("19/10/2026"));
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_invalid_url_display() {
        let err = Error::InvalidUrl {
            url: "not a url".to_string(),
            message: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "page_size must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_non_http_errors_are_not_backend_unavailable() {
        assert!(!Error::MissingCredentials.is_backend_unavailable());
        assert!(!Error::api("/api/login", 401, "").is_backend_unavailable());
    }
}
