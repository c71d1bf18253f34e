//! CLI error types.
//!
//! Three layers, matching the order in which an invocation can fail:
//! - [`ValidationError`]: bad input, detected before any network activity.
//! - [`Failure`]: the remote call failed, already classified by the adapter.
//! - [`CliError`]: anything the invocation driver reports to the user.

use kmsctl_proto::{Operation, ProtoError};
use thiserror::Error;

use crate::client::TransportError;

/// Client-side input validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required input was not bound.
    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    /// An integer input fell outside its closed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Input name.
        field: String,
        /// Value supplied.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// The output selector does not resolve against the operation.
    #[error("invalid selector '{expression}': {reason}")]
    InvalidSelector {
        /// The selector as supplied.
        expression: String,
        /// Why it does not resolve.
        reason: String,
    },

    /// A value could not be parsed as the input's type.
    #[error("invalid value '{value}' for {field}: expected {expected}")]
    InvalidValue {
        /// Input name.
        field: String,
        /// Value supplied.
        value: String,
        /// Description of acceptable values.
        expected: String,
    },

    /// A value was bound under a name the operation does not declare.
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Classified failure of a remote call.
#[derive(Debug, Error)]
pub enum Failure {
    /// The endpoint could not be reached or the connection broke.
    #[error("{operation} failed: {cause}. {hint}")]
    ConnectivityFailure {
        /// Operation being invoked.
        operation: Operation,
        /// Network diagnostic advice.
        hint: &'static str,
        /// The transport fault.
        #[source]
        cause: TransportError,
    },

    /// The service received the request and declined it.
    #[error("{operation} failed: {code}: {message}")]
    ServiceRejection {
        /// Operation being invoked.
        operation: Operation,
        /// Remote error code.
        code: String,
        /// Remote error message.
        message: String,
        /// Underlying decode fault for malformed replies.
        #[source]
        cause: Option<ProtoError>,
    },

    /// The request could not be assembled from the bound inputs.
    #[error("{operation} failed: could not build request: {cause}")]
    InvalidRequest {
        /// Operation being invoked.
        operation: Operation,
        /// The offending input.
        #[source]
        cause: ValidationError,
    },
}

impl Failure {
    /// Whether this failure came from the network rather than the service.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::ConnectivityFailure { .. })
    }

    /// The remote error code, for service rejections.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::ServiceRejection { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Errors reported by the invocation driver.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input rejected before any remote call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote call failed.
    #[error(transparent)]
    Failure(#[from] Failure),

    /// No operation is registered under this command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
