//! Error types for storefront-gallery
//!
//! Fetch failures come in two flavours that callers treat alike:
//! - [`Error::Transport`] when the endpoint answers with a non-success status
//! - [`Error::Protocol`] when the body decodes but carries a GraphQL `errors` array
//!
//! An absent optional resource (no decks) is not an error; see
//! [`ResourceStatus`](crate::types::ResourceStatus).

use crate::types::ViewKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for storefront-gallery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for storefront-gallery
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "storefront.shop_domain")
        key: Option<String>,
    },

    /// The endpoint answered with a non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Transport {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The response decoded but carried a non-empty GraphQL error list
    #[error("GraphQL errors: {}", join_messages(.errors))]
    Protocol {
        /// Errors reported by the endpoint
        errors: Vec<GraphQlError>,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image could not be decoded
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// PDF assembly failed
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Export requested with nothing selected
    #[error("nothing selected in the {view} view")]
    EmptySelection {
        /// View whose selection is empty
        view: ViewKind,
    },

    /// Selection position outside the displayed list
    #[error("position {position} is out of range for {len} records")]
    InvalidPosition {
        /// Requested position
        position: usize,
        /// Number of records currently displayed
        len: usize,
    },

    /// An export or download sequence is already running
    #[error("an export is already in progress")]
    Busy,

    /// File collision that could not be resolved
    #[error("file collision at {}: {reason}", path.display())]
    FileCollision {
        /// Path that collided
        path: PathBuf,
        /// Why the collision could not be resolved
        reason: String,
    },

    /// Path that cannot be used as an output location
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// Offending path
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },
}

impl Error {
    /// Create a configuration error for a specific key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Whether this error belongs to the "fetch failed" class
    ///
    /// Transport and protocol failures are equivalent for callers; network
    /// and decode failures on the same call land here too.
    #[must_use]
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. }
                | Error::Protocol { .. }
                | Error::Network(_)
                | Error::Serialization(_)
        )
    }
}

/// One entry of a GraphQL `errors` array
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    /// Error message
    pub message: String,
    /// Response path the error applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
    /// Vendor-specific details (error code, cost, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

fn join_messages(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_lists_every_message() {
        let err = Error::Protocol {
            errors: vec![
                GraphQlError {
                    message: "Field 'foo' doesn't exist".to_string(),
                    path: None,
                    extensions: None,
                },
                GraphQlError {
                    message: "Throttled".to_string(),
                    path: None,
                    extensions: None,
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field 'foo' doesn't exist; Throttled"
        );
    }

    #[test]
    fn transport_and_protocol_are_fetch_failures() {
        let transport = Error::Transport {
            status: 502,
            url: "https://shop.example.com/api/unstable/graphql.json".to_string(),
        };
        let protocol = Error::Protocol { errors: vec![] };

        assert!(transport.is_fetch_failure());
        assert!(protocol.is_fetch_failure());
        assert!(!Error::Busy.is_fetch_failure());
        assert!(
            !Error::InvalidPosition {
                position: 3,
                len: 2
            }
            .is_fetch_failure()
        );
    }

    #[test]
    fn graphql_error_accepts_minimal_payload() {
        let err: GraphQlError =
            serde_json::from_str(r#"{"message":"Access denied"}"#).expect("valid error json");

        assert_eq!(err.message, "Access denied");
        assert!(err.path.is_none());
        assert!(err.extensions.is_none());
    }
}
