//! Error types for bqsql.

use thiserror::Error;

/// Message fragments the warehouse reports when parameter type tags are
/// missing or misaligned.
const PARAM_TYPE_ERRORS: &[&str] = &[
    "Parameter types must be provided for null values",
    "incorrect number of parameter types",
];

const PARAM_TYPE_HINT: &str = "Type tags for null parameters are inferred automatically. \
     If this error persists, please report it as a bug";

/// Which adapter call a warehouse failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    Stream,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Query => write!(f, "query"),
            Operation::Stream => write!(f, "stream query"),
        }
    }
}

/// Failure reported by a [`WarehouseClient`](crate::engine::WarehouseClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Structured error returned by the warehouse API.
    #[error("{message}")]
    Api { message: String, code: Option<u16> },

    /// Any other failure shape (transport, decoding, ...).
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ClientError {
    /// Create a structured API error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            code: None,
        }
    }
}

/// The main error type for bqsql operations.
#[derive(Debug, Error)]
pub enum BqError {
    /// A structured warehouse error, re-wrapped with the failing operation.
    #[error("BigQuery {operation} failed: {message}{}", hint_suffix(.hint))]
    Execution {
        operation: Operation,
        message: String,
        hint: Option<&'static str>,
    },

    /// A non-standard client failure, passed through untouched.
    #[error(transparent)]
    Client(ClientError),

    /// Operation with no meaning on the target warehouse.
    #[error("{0} is not supported by BigQuery")]
    Unsupported(&'static str),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid TOML configuration.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BqError {
    /// Wrap a client failure raised by `operation`.
    ///
    /// Structured API errors get a contextual prefix (and a hint for the
    /// parameter-type family); anything else is forwarded as-is so no
    /// information is lost.
    pub fn from_client(operation: Operation, err: ClientError) -> Self {
        match err {
            ClientError::Api { message, .. } => {
                let hint = PARAM_TYPE_ERRORS
                    .iter()
                    .any(|needle| message.contains(needle))
                    .then_some(PARAM_TYPE_HINT);
                Self::Execution {
                    operation,
                    message,
                    hint,
                }
            }
            other => Self::Client(other),
        }
    }
}

fn hint_suffix(hint: &Option<&'static str>) -> String {
    match hint {
        Some(h) => format!(". {}", h),
        None => String::new(),
    }
}

/// Result type alias for bqsql operations.
pub type BqResult<T> = Result<T, BqError>;
