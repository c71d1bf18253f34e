//! Error types for the kmsctl-proto crate.

use thiserror::Error;

/// Errors that can occur while encoding or decoding protocol messages.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// Failed to encode a message.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Failed to decode a message.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// A token did not name a known enum member.
    #[error("unknown {kind} token: {token}")]
    UnknownToken {
        /// Which enumeration was being parsed.
        kind: &'static str,
        /// The offending token.
        token: String,
    },
}
