//! Declarative operation table.
//!
//! Each remote operation is described by one [`OperationDescriptor`]:
//! its inputs, how disruptive it is, the shape of its response, and how to
//! assemble its request from a bound [`ExecutionContext`]. The CLI
//! subcommands, the context validation, the confirmation prompt and the
//! command adapter are all driven from these rows.
//!
//! - [`keys`] - key lifecycle and rotation
//! - [`aliases`] - alias management

pub mod aliases;
pub mod keys;

use kmsctl_proto::{KmsRequest, Operation};

use crate::context::ExecutionContext;
use crate::error::ValidationError;

/// Default number of entries per list page.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// How disruptive an operation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Impact {
    /// Read-only; never prompts.
    None,
    /// Changes state in a recoverable way.
    Medium,
    /// Destroys or hides data.
    High,
}

impl Impact {
    /// Whether operations of this impact need confirmation.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Type and constraints of one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Free-form string.
    Text,
    /// Integer within a closed range, with an optional default.
    Integer {
        /// Value bound when the input is absent.
        default: Option<i64>,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// One token out of a closed set.
    Token(&'static [&'static str]),
}

/// One bindable input of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    /// Field name, as used on the wire and by `^name` selectors.
    pub name: &'static str,
    /// Long flag name on the command line.
    pub flag: &'static str,
    /// Help text.
    pub help: &'static str,
    /// Type and constraints.
    pub kind: InputKind,
    /// Whether the input must be bound.
    pub required: bool,
}

impl InputSpec {
    /// A required string input.
    #[must_use]
    pub const fn required(name: &'static str, flag: &'static str, help: &'static str) -> Self {
        Self {
            name,
            flag,
            help,
            kind: InputKind::Text,
            required: true,
        }
    }

    /// An optional string input.
    #[must_use]
    pub const fn optional(name: &'static str, flag: &'static str, help: &'static str) -> Self {
        Self {
            name,
            flag,
            help,
            kind: InputKind::Text,
            required: false,
        }
    }

    /// An optional integer input bounded to `[min, max]`.
    #[must_use]
    pub const fn integer(
        name: &'static str,
        flag: &'static str,
        help: &'static str,
        default: Option<i64>,
        min: i64,
        max: i64,
    ) -> Self {
        Self {
            name,
            flag,
            help,
            kind: InputKind::Integer { default, min, max },
            required: false,
        }
    }

    /// An optional token input.
    #[must_use]
    pub const fn token(
        name: &'static str,
        flag: &'static str,
        help: &'static str,
        tokens: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            flag,
            help,
            kind: InputKind::Token(tokens),
            required: false,
        }
    }
}

/// Where a paginated response carries its continuation cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Response field holding the cursor.
    pub field: &'static str,
    /// Flag that feeds it back in.
    pub flag: &'static str,
}

/// Builds the typed request from a validated context.
pub type RequestBuilder = fn(&ExecutionContext) -> Result<KmsRequest, ValidationError>;

/// Everything the generic engine needs to know about one operation.
#[derive(Debug, Clone, Copy)]
pub struct OperationDescriptor {
    /// Remote operation.
    pub operation: Operation,
    /// Subcommand name.
    pub command: &'static str,
    /// One-line help.
    pub about: &'static str,
    /// Confirmation strictness.
    pub impact: Impact,
    /// Bindable inputs.
    pub inputs: &'static [InputSpec],
    /// Top-level fields the response may carry.
    pub response_fields: &'static [&'static str],
    /// Field projected when no selector is given; `None` projects nothing.
    pub default_field: Option<&'static str>,
    /// Continuation cursor, for paginated operations.
    pub cursor: Option<Cursor>,
    /// Inputs that identify the affected resource in confirmation prompts.
    pub target_fields: &'static [&'static str],
    /// Request assembly.
    pub build: RequestBuilder,
}

impl OperationDescriptor {
    /// Look up an input by field name.
    #[must_use]
    pub fn input(&self, name: &str) -> Option<&'static InputSpec> {
        self.inputs.iter().find(|spec| spec.name == name)
    }

    /// Look up a declared response field by name.
    #[must_use]
    pub fn response_field(&self, name: &str) -> Option<&'static str> {
        self.response_fields.iter().copied().find(|field| *field == name)
    }
}

/// Every operation, keys first.
pub fn all() -> impl Iterator<Item = &'static OperationDescriptor> {
    keys::OPERATIONS.iter().chain(aliases::OPERATIONS.iter())
}

/// Find the descriptor for a subcommand name.
#[must_use]
pub fn find(command: &str) -> Option<&'static OperationDescriptor> {
    all().find(|descriptor| descriptor.command == command)
}

pub(crate) const KEY_ID: InputSpec = InputSpec::required(
    "KeyId",
    "key-id",
    "Key id, key ARN, alias name or alias ARN",
);

pub(crate) const LIMIT: InputSpec = InputSpec::integer(
    "Limit",
    "limit",
    "Maximum number of entries to return in this page (1-100, default 50)",
    Some(DEFAULT_PAGE_SIZE),
    1,
    100,
);

pub(crate) const MARKER: InputSpec = InputSpec::optional(
    "Marker",
    "marker",
    "Continuation cursor returned by a previous page",
);

/// Narrow a range-checked integer input to the wire type.
pub(crate) fn wire_u32(
    ctx: &ExecutionContext,
    name: &str,
) -> Result<Option<u32>, ValidationError> {
    ctx.int(name)
        .map(|value| {
            u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
                field: name.to_string(),
                value,
                min: 0,
                max: i64::from(u32::MAX),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::context::RawInput;

    #[test]
    fn command_names_are_unique() {
        let mut seen = HashSet::new();
        for descriptor in all() {
            assert!(seen.insert(descriptor.command), "duplicate {}", descriptor.command);
        }
    }

    #[test]
    fn every_operation_has_exactly_one_descriptor() {
        let operations: HashSet<Operation> = all().map(|d| d.operation).collect();
        assert_eq!(operations.len(), all().count());
        assert_eq!(operations.len(), 15);
    }

    #[test]
    fn default_and_cursor_fields_are_response_fields() {
        for descriptor in all() {
            if let Some(field) = descriptor.default_field {
                assert!(descriptor.response_field(field).is_some(), "{}", descriptor.command);
            }
            if let Some(cursor) = descriptor.cursor {
                assert!(descriptor.response_field(cursor.field).is_some(), "{}", descriptor.command);
                assert!(
                    descriptor.inputs.iter().any(|spec| spec.flag == cursor.flag),
                    "{}",
                    descriptor.command
                );
            }
        }
    }

    #[test]
    fn target_fields_are_inputs() {
        for descriptor in all() {
            for field in descriptor.target_fields {
                assert!(descriptor.input(field).is_some(), "{}: {field}", descriptor.command);
            }
        }
    }

    #[test]
    fn read_operations_have_no_impact() {
        for command in ["get-key", "list-keys", "list-aliases", "get-key-rotation-status"] {
            let descriptor = find(command).expect("registered");
            assert_eq!(descriptor.impact, Impact::None);
        }
        assert_eq!(find("delete-alias").expect("registered").impact, Impact::High);
        assert_eq!(
            find("schedule-key-deletion").expect("registered").impact,
            Impact::High
        );
    }

    #[test]
    fn every_builder_accepts_minimal_inputs() {
        for descriptor in all() {
            let raw = descriptor
                .inputs
                .iter()
                .filter(|spec| spec.required)
                .fold(RawInput::new(), |raw, spec| raw.with_value(spec.name, "value"));
            let ctx = ExecutionContext::build(descriptor, raw).expect("valid context");
            let request = (descriptor.build)(&ctx).expect("request");
            assert_eq!(request.operation(), descriptor.operation);
        }
    }

    #[test]
    fn lookup_by_command() {
        let descriptor = find("delete-alias").expect("registered");
        assert_eq!(descriptor.operation, Operation::DeleteAlias);
        assert!(find("no-such-command").is_none());
    }
}
