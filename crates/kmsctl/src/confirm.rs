//! Confirmation gate for mutating operations.

use std::io::{self, BufRead, IsTerminal, Write};

use tracing::debug;

use crate::context::ExecutionContext;
use crate::operations::Impact;

/// Whether the invocation may continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Hand the context to the adapter.
    Proceed,
    /// Stop without output.
    Abort,
}

/// Answer to a confirmation question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// Explicit affirmation.
    Yes,
    /// Anything else.
    No,
    /// Nobody can be asked (no terminal, EOF, read error).
    Unavailable,
}

/// Source of confirmation answers.
pub trait Prompter {
    /// Ask `question` and wait for the answer.
    fn confirm(&mut self, question: &str) -> Answer;
}

/// Prompts on stderr and reads the answer from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, question: &str) -> Answer {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            debug!("stdin is not a terminal, not prompting");
            return Answer::Unavailable;
        }

        let mut stderr = io::stderr();
        if let Err(e) = write!(stderr, "{question} [y/N] ").and_then(|()| stderr.flush()) {
            debug!(error = %e, "could not write prompt");
            return Answer::Unavailable;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => Answer::Unavailable,
            Ok(_) => parse_answer(&line),
            Err(e) => {
                debug!(error = %e, "could not read answer");
                Answer::Unavailable
            }
        }
    }
}

/// `y` or `yes`, any case, is a yes. Everything else is a no.
#[must_use]
pub fn parse_answer(line: &str) -> Answer {
    let answer = line.trim();
    if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
        Answer::Yes
    } else {
        Answer::No
    }
}

/// The confirmation question for `ctx`.
#[must_use]
pub fn question(ctx: &ExecutionContext) -> String {
    let descriptor = ctx.descriptor();
    let severity = match descriptor.impact {
        Impact::High => "This cannot be undone. ",
        Impact::Medium | Impact::None => "",
    };
    format!(
        "{severity}Performing \"{} ({})\" on target \"{}\". Continue?",
        descriptor.command,
        descriptor.operation,
        ctx.target()
    )
}

/// Decide whether `ctx` may be executed.
///
/// Read operations and `force` proceed without asking. Mutating operations
/// proceed only on an explicit yes.
pub fn decide<P>(ctx: &ExecutionContext, force: bool, prompter: &mut P) -> Decision
where
    P: Prompter + ?Sized,
{
    let impact = ctx.descriptor().impact;
    if !impact.is_mutating() || force {
        return Decision::Proceed;
    }

    match prompter.confirm(&question(ctx)) {
        Answer::Yes => Decision::Proceed,
        answer => {
            debug!(?answer, command = ctx.descriptor().command, "confirmation not given");
            Decision::Abort
        }
    }
}
