//! kmsctl binary entrypoint.

use std::io;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::FromArgMatches;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use kmsctl::driver::Outcome;
use kmsctl::{cli, Cli, InvocationDriver, OutputFormat, TerminalPrompter, WsKmsClient};

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match try_main() {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> anyhow::Result<Outcome> {
    let matches = cli::command().get_matches();
    let args = Cli::from_arg_matches(&matches)?;
    let invocation = cli::invocation(&matches)?;

    let runtime = tokio::runtime::Runtime::new().context("failed to create async runtime")?;

    Ok(runtime.block_on(async move {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if matches!(tokio::signal::ctrl_c().await, Ok(())) {
                debug!("interrupt received");
                on_interrupt.cancel();
            }
        });

        let client = WsKmsClient::new(args.settings());
        let mut prompter = TerminalPrompter;
        let mut driver = InvocationDriver::new(
            &client,
            &mut prompter,
            OutputFormat::new(args.format),
            cancel,
        );
        driver
            .run(invocation, &mut io::stdout(), &mut io::stderr())
            .await
    }))
}
