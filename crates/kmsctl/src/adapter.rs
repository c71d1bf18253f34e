//! The generic command adapter.
//!
//! One [`CommandAdapter`] serves every operation: it assembles the request
//! through the descriptor's builder, makes a single call through the
//! [`KmsClient`], and turns the outcome into an [`OutputEnvelope`]. Raw
//! client errors never leave this module unclassified.

use kmsctl_proto::{KmsResponse, Operation};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::{KmsClient, RpcError, TransportError};
use crate::context::ExecutionContext;
use crate::error::Failure;

/// Result of one adapter execution.
#[derive(Debug)]
pub enum OutputEnvelope {
    /// The call succeeded.
    Success {
        /// The projected value.
        output: Value,
        /// The full response payload.
        response: Value,
    },
    /// The call failed, already classified.
    Failure(Failure),
}

/// The cancellation token fired while the call was in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Executes validated contexts against a client.
#[derive(Debug)]
pub struct CommandAdapter<'c, C> {
    client: &'c C,
}

impl<'c, C: KmsClient> CommandAdapter<'c, C> {
    /// Adapter calling through `client`.
    #[must_use]
    pub const fn new(client: &'c C) -> Self {
        Self { client }
    }

    /// Build, send and project one request.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if `cancel` fires before the call completes;
    /// the in-flight call is dropped.
    pub async fn execute(
        &self,
        ctx: &ExecutionContext,
        cancel: &CancellationToken,
    ) -> Result<OutputEnvelope, Cancelled> {
        let descriptor = ctx.descriptor();
        let operation = descriptor.operation;

        let request = match (descriptor.build)(ctx) {
            Ok(request) => request,
            Err(cause) => {
                return Ok(OutputEnvelope::Failure(Failure::InvalidRequest {
                    operation,
                    cause,
                }));
            }
        };

        debug!(%operation, "invoking");
        let result = tokio::select! {
            () = cancel.cancelled() => {
                debug!(%operation, "cancelled while in flight");
                return Err(Cancelled);
            }
            result = self.client.call(request) => result,
        };

        Ok(match result {
            Ok(response) => envelope(ctx, operation, &response),
            Err(err) => {
                warn!(%operation, error = %err, "call failed");
                OutputEnvelope::Failure(classify(operation, err))
            }
        })
    }
}

fn envelope(
    ctx: &ExecutionContext,
    operation: Operation,
    response: &KmsResponse,
) -> OutputEnvelope {
    if response.operation() != operation {
        return OutputEnvelope::Failure(Failure::ServiceRejection {
            operation,
            code: "UnexpectedResponse".into(),
            message: format!("expected a {operation} response, got {}", response.operation()),
            cause: None,
        });
    }

    match response.payload() {
        Ok(response) => OutputEnvelope::Success {
            output: ctx.projection().project(&response, ctx.inputs()),
            response,
        },
        Err(e) => OutputEnvelope::Failure(Failure::ServiceRejection {
            operation,
            code: "ProtocolError".into(),
            message: e.to_string(),
            cause: Some(e),
        }),
    }
}

/// Map a client error onto the failure surface.
///
/// Undecodable replies count as a rejection by the service, not as a
/// connectivity problem.
#[must_use]
pub fn classify(operation: Operation, err: RpcError) -> Failure {
    match err {
        RpcError::Service { code, message } => Failure::ServiceRejection {
            operation,
            code,
            message,
            cause: None,
        },
        RpcError::Transport(TransportError::Protocol(e)) => Failure::ServiceRejection {
            operation,
            code: "ProtocolError".into(),
            message: e.to_string(),
            cause: Some(e),
        },
        RpcError::Transport(cause) => Failure::ConnectivityFailure {
            operation,
            hint: cause.hint(),
            cause,
        },
    }
}
