//! Command-line argument parsing with clap.
//!
//! Global connection flags come from the derived [`Cli`]; the per-operation
//! subcommands are generated from the operation table and attached by
//! [`command`].

use std::time::Duration;

use clap::{Arg, ArgAction, ArgMatches, Command, CommandFactory, Parser, ValueEnum};

use crate::client::ClientSettings;
use crate::context::RawInput;
use crate::driver::Invocation;
use crate::error::CliError;
use crate::operations::{self, InputKind, InputSpec, OperationDescriptor};

/// Endpoint used when neither `--endpoint` nor `KMSCTL_ENDPOINT` is set.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8443";

const SELECT: &str = "select";
const FORCE: &str = "force";

/// kmsctl - key management control plane from the command line.
#[derive(Parser, Debug, Clone)]
#[command(name = "kmsctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control plane endpoint to connect to.
    #[arg(short, long, global = true, env = "KMSCTL_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Region to address requests to.
    #[arg(short, long, global = true, env = "KMSCTL_REGION")]
    pub region: Option<String>,

    /// Output format.
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Seconds allowed for connecting to the endpoint.
    #[arg(long, global = true, env = "KMSCTL_CONNECT_TIMEOUT", value_name = "SECONDS", default_value_t = 10)]
    pub connect_timeout: u64,

    /// Seconds allowed for each request.
    #[arg(long, global = true, env = "KMSCTL_REQUEST_TIMEOUT", value_name = "SECONDS", default_value_t = 30)]
    pub request_timeout: u64,
}

impl Cli {
    /// Client settings described by the global flags.
    #[must_use]
    pub fn settings(&self) -> ClientSettings {
        let settings = ClientSettings::new(&self.endpoint)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout))
            .with_request_timeout(Duration::from_secs(self.request_timeout));
        match &self.region {
            Some(region) => settings.with_region(region),
            None => settings,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// The full command: global flags plus one subcommand per operation.
#[must_use]
pub fn command() -> Command {
    Cli::command()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(operations::all().map(subcommand_for))
}

fn subcommand_for(descriptor: &'static OperationDescriptor) -> Command {
    let command = Command::new(descriptor.command)
        .about(descriptor.about)
        .args(descriptor.inputs.iter().map(input_arg))
        .arg(
            Arg::new(SELECT)
                .long("select")
                .value_name("EXPR")
                .help(select_help(descriptor)),
        );

    if descriptor.impact.is_mutating() {
        command.arg(
            Arg::new(FORCE)
                .long("force")
                .action(ArgAction::SetTrue)
                .help("Do not ask for confirmation"),
        )
    } else {
        command
    }
}

// Required inputs are checked by the execution context, not by clap, so that
// a missing one is reported like every other validation failure.
fn input_arg(spec: &'static InputSpec) -> Arg {
    let (value_name, detail) = match spec.kind {
        InputKind::Text => ("STRING", None),
        InputKind::Integer { .. } => ("N", None),
        InputKind::Token(tokens) => ("TOKEN", Some(format!(" [one of: {}]", tokens.join(", ")))),
    };
    let required = if spec.required { " (required)" } else { "" };

    Arg::new(spec.name)
        .long(spec.flag)
        .value_name(value_name)
        .allow_negative_numbers(matches!(spec.kind, InputKind::Integer { .. }))
        .help(format!("{}{required}{}", spec.help, detail.unwrap_or_default()))
}

fn select_help(descriptor: &OperationDescriptor) -> String {
    let default = descriptor
        .default_field
        .map_or_else(|| "nothing".to_string(), |field| format!("'{field}'"));
    format!("Output selector: '*' for the whole response, '^Name' to echo an input, or a response field name (default: {default})")
}

/// Turn parsed matches into an [`Invocation`].
///
/// # Errors
///
/// Returns [`CliError::UnknownCommand`] if no registered operation matches
/// the subcommand.
pub fn invocation(matches: &ArgMatches) -> Result<Invocation, CliError> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| CliError::UnknownCommand(String::new()))?;
    let descriptor =
        operations::find(name).ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;

    let mut raw = descriptor
        .inputs
        .iter()
        .filter_map(|spec| sub.get_one::<String>(spec.name).map(|value| (spec.name, value)))
        .fold(RawInput::new(), |raw, (name, value)| raw.with_value(name, value.clone()));
    if let Some(selector) = sub.get_one::<String>(SELECT) {
        raw = raw.with_selector(selector.clone());
    }
    let force = descriptor.impact.is_mutating() && sub.get_flag(FORCE);

    Ok(Invocation {
        descriptor,
        raw,
        force,
    })
}
