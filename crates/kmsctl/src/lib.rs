//! # kmsctl
//!
//! Command-line adapters for key management control-plane operations.
//!
//! Every subcommand runs through the same pipeline:
//!
//! ```text
//! argv ─► Invocation ─► ExecutionContext ─► confirmation ─► CommandAdapter ─► output
//!            (cli)        (validate inputs,     (mutating       (KmsClient call,
//!                          resolve selector)     ops only)       classify errors)
//! ```
//!
//! Operations are rows in a declarative table ([`operations`]); adding one
//! means adding a descriptor and a request builder, nothing else.
//!
//! # Architecture
//!
//! The CLI talks to the control plane over WebSocket using the envelopes
//! defined in `kmsctl-proto`. [`client::WsKmsClient`] handles the connection;
//! anything implementing [`client::KmsClient`] can stand in for it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod cli;
pub mod client;
pub mod confirm;
pub mod context;
pub mod driver;
pub mod error;
pub mod operations;
pub mod output;
pub mod selector;

#[cfg(test)]
mod testing;

pub use adapter::{CommandAdapter, OutputEnvelope};
pub use cli::{Cli, Format};
pub use client::{ClientSettings, KmsClient, WsKmsClient};
pub use confirm::{Prompter, TerminalPrompter};
pub use context::{ExecutionContext, RawInput};
pub use driver::{Invocation, InvocationDriver, Outcome};
pub use error::{CliError, Failure, ValidationError};
pub use output::OutputFormat;
