//! Error types for the relay-alerts crate.

use thiserror::Error;

/// Errors that can occur while relaying notifications.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// The outbound webhook is missing or misconfigured.
    ///
    /// Fatal for a whole batch: no delivery is attempted.
    #[error("configuration error: {reason}")]
    Configuration {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// A record (or the envelope around it) is not valid structured data.
    #[error("decode error: {reason}")]
    Decode {
        /// Why decoding failed.
        reason: String,
    },

    /// The outbound POST failed or returned a non-2xx status.
    #[error("delivery failed: {reason}")]
    Delivery {
        /// Why the delivery failed.
        reason: String,
        /// HTTP status returned by the endpoint, if one was received.
        status_code: Option<u16>,
    },

    /// A rendered message could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl RelayError {
    /// Creates a configuration error.
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Creates a delivery error without a status code.
    pub fn delivery(reason: impl Into<String>) -> Self {
        Self::Delivery {
            reason: reason.into(),
            status_code: None,
        }
    }

    /// Returns a short, stable name for the error category.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Decode { .. } => "decode",
            Self::Delivery { .. } => "delivery",
            Self::Serialization(_) => "serialization",
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_configuration() {
        let err = RelayError::configuration("webhook URL not set");
        assert_eq!(err.to_string(), "configuration error: webhook URL not set");
    }

    #[test]
    fn error_display_decode() {
        let err = RelayError::decode("expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "decode error: expected value at line 1 column 1"
        );
    }

    #[test]
    fn error_display_delivery() {
        let err = RelayError::Delivery {
            reason: "endpoint returned 500".to_string(),
            status_code: Some(500),
        };
        assert_eq!(err.to_string(), "delivery failed: endpoint returned 500");
    }

    #[test]
    fn error_kind_names() {
        assert_eq!(RelayError::configuration("x").kind(), "configuration");
        assert_eq!(RelayError::decode("x").kind(), "decode");
        assert_eq!(RelayError::delivery("x").kind(), "delivery");
        assert_eq!(
            RelayError::Serialization("x".to_string()).kind(),
            "serialization"
        );
    }

    #[test]
    fn error_from_serde_json() {
        let json_err = serde_json::from_str::<String>("invalid json");
        assert!(json_err.is_err());
        let relay_err: RelayError = json_err.unwrap_err().into();
        assert!(matches!(relay_err, RelayError::Serialization(_)));
    }
}
