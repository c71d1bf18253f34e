//! Invocation driver: runs one command from raw input to rendered output.

use std::io::Write;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::adapter::{Cancelled, CommandAdapter, OutputEnvelope};
use crate::client::KmsClient;
use crate::confirm::{self, Decision, Prompter};
use crate::context::{ExecutionContext, RawInput};
use crate::error::CliError;
use crate::operations::OperationDescriptor;
use crate::output::OutputFormat;

/// Exit code for a cancelled invocation (128 + SIGINT).
pub const EXIT_CANCELLED: u8 = 130;

/// One parsed command line.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Operation to run.
    pub descriptor: &'static OperationDescriptor,
    /// Unvalidated inputs and selector.
    pub raw: RawInput,
    /// Skip the confirmation prompt.
    pub force: bool,
}

/// Why an invocation stopped without running to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Confirmation was refused or could not be obtained.
    Declined,
    /// The user interrupted the command.
    Cancelled,
}

/// How an invocation ended.
#[derive(Debug)]
pub enum Outcome {
    /// Output was rendered.
    Completed,
    /// Stopped silently.
    Aborted(AbortReason),
    /// Reported on the error channel.
    Failed(CliError),
}

impl Outcome {
    /// Process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Completed | Self::Aborted(AbortReason::Declined) => 0,
            Self::Aborted(AbortReason::Cancelled) => EXIT_CANCELLED,
            Self::Failed(_) => 1,
        }
    }
}

/// Runs invocations against one client.
pub struct InvocationDriver<'a, C, P: ?Sized> {
    client: &'a C,
    prompter: &'a mut P,
    format: OutputFormat,
    cancel: CancellationToken,
}

impl<'a, C, P> InvocationDriver<'a, C, P>
where
    C: KmsClient,
    P: Prompter + ?Sized,
{
    /// Create a driver.
    pub fn new(
        client: &'a C,
        prompter: &'a mut P,
        format: OutputFormat,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            prompter,
            format,
            cancel,
        }
    }

    /// Run `invocation`, writing the result to `out` and diagnostics to
    /// `err`.
    ///
    /// Validation happens before the confirmation prompt, and nothing is
    /// sent unless both pass.
    pub async fn run<O, E>(&mut self, invocation: Invocation, out: &mut O, err: &mut E) -> Outcome
    where
        O: Write,
        E: Write,
    {
        let outcome = self.drive(invocation, out, err).await;
        if let Outcome::Failed(e) = &outcome {
            // Nowhere left to report a failing error channel.
            let _ = writeln!(err, "Error: {e}");
        }
        outcome
    }

    async fn drive<O, E>(&mut self, invocation: Invocation, out: &mut O, err: &mut E) -> Outcome
    where
        O: Write,
        E: Write,
    {
        let Invocation {
            descriptor,
            raw,
            force,
        } = invocation;

        let ctx = match ExecutionContext::build(descriptor, raw) {
            Ok(ctx) => ctx,
            Err(e) => return Outcome::Failed(e.into()),
        };

        if confirm::decide(&ctx, force, &mut *self.prompter) == Decision::Abort {
            info!(command = descriptor.command, "not confirmed, aborting");
            return Outcome::Aborted(AbortReason::Declined);
        }
        if self.cancel.is_cancelled() {
            return Outcome::Aborted(AbortReason::Cancelled);
        }

        let envelope = match CommandAdapter::new(self.client).execute(&ctx, &self.cancel).await {
            Ok(envelope) => envelope,
            Err(Cancelled) => return Outcome::Aborted(AbortReason::Cancelled),
        };

        match envelope {
            OutputEnvelope::Success { output, response } => {
                if let Err(e) = self.format.write(out, &output) {
                    return Outcome::Failed(e);
                }
                if !ctx.projection().is_whole() {
                    if let Err(e) = cursor_hint(&ctx, &response, err) {
                        return Outcome::Failed(e);
                    }
                }
                debug!(command = descriptor.command, "completed");
                Outcome::Completed
            }
            OutputEnvelope::Failure(failure) => Outcome::Failed(failure.into()),
        }
    }
}

/// Point at the next page when the response was truncated.
fn cursor_hint<E: Write>(
    ctx: &ExecutionContext,
    response: &Value,
    err: &mut E,
) -> Result<(), CliError> {
    let Some(cursor) = ctx.descriptor().cursor else {
        return Ok(());
    };
    if let Some(next) = response.get(cursor.field).and_then(Value::as_str) {
        writeln!(
            err,
            "More results are available; rerun with --{} {next}",
            cursor.flag
        )?;
    }
    Ok(())
}
