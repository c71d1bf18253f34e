//! Output selectors.
//!
//! A selector chooses what part of an operation's result is printed:
//!
//! | expression | projects                                        |
//! |------------|-------------------------------------------------|
//! | *(empty)*  | the operation's default response field          |
//! | `*`        | the whole response                              |
//! | `^Name`    | the input bound as `Name` (echoes what was sent)|
//! | `Name`     | the response field `Name`                       |
//!
//! Selectors are resolved once against an [`OperationDescriptor`] when the
//! execution context is built, so a bad selector fails before any request is
//! sent. The resolved [`Projection`] is a pure function of the response and
//! the bound inputs.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::context::InputValue;
use crate::error::ValidationError;
use crate::operations::OperationDescriptor;

/// Parsed selector expression, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Empty or omitted.
    Default,
    /// `*`
    Identity,
    /// `^Name`
    EchoInput(String),
    /// `Name`
    Field(String),
}

impl Selector {
    /// Parse the selector syntax. Never fails; names are checked by
    /// [`Selector::resolve`].
    #[must_use]
    pub fn parse(expression: &str) -> Self {
        if expression.is_empty() {
            Self::Default
        } else if expression == "*" {
            Self::Identity
        } else if let Some(name) = expression.strip_prefix('^') {
            Self::EchoInput(name.to_string())
        } else {
            Self::Field(expression.to_string())
        }
    }

    /// Resolve against the operation's inputs and response shape.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSelector`] when the named input or
    /// response field does not exist. Names are case-sensitive.
    pub fn resolve(
        &self,
        descriptor: &OperationDescriptor,
    ) -> Result<Projection, ValidationError> {
        match self {
            Self::Default => Ok(descriptor
                .default_field
                .map_or(Projection::Nothing, Projection::Field)),
            Self::Identity => Ok(Projection::Whole),
            Self::EchoInput(name) => descriptor
                .input(name)
                .map(|spec| Projection::Input(spec.name))
                .ok_or_else(|| invalid(&format!("^{name}"), descriptor, "no such input")),
            Self::Field(name) => descriptor
                .response_field(name)
                .map(Projection::Field)
                .ok_or_else(|| invalid(name, descriptor, "no such response field")),
        }
    }
}

/// A resolved selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// The operation has no default payload; prints nothing.
    Nothing,
    /// The raw response.
    Whole,
    /// A bound input.
    Input(&'static str),
    /// A response field.
    Field(&'static str),
}

impl Projection {
    /// Apply to a response. Absent fields and unbound inputs project to
    /// `null`.
    #[must_use]
    pub fn project(&self, response: &Value, inputs: &BTreeMap<&'static str, InputValue>) -> Value {
        match self {
            Self::Nothing => Value::Null,
            Self::Whole => response.clone(),
            Self::Input(name) => inputs.get(name).map_or(Value::Null, InputValue::to_json),
            Self::Field(name) => response.get(name).cloned().unwrap_or(Value::Null),
        }
    }

    /// Whether the whole raw response is projected.
    #[must_use]
    pub const fn is_whole(&self) -> bool {
        matches!(self, Self::Whole)
    }
}

fn invalid(expression: &str, descriptor: &OperationDescriptor, reason: &str) -> ValidationError {
    ValidationError::InvalidSelector {
        expression: expression.to_string(),
        reason: format!("{reason} for {}", descriptor.command),
    }
}

/// Parse and resolve in one step.
///
/// # Errors
///
/// See [`Selector::resolve`].
pub fn resolve(
    expression: &str,
    descriptor: &OperationDescriptor,
) -> Result<Projection, ValidationError> {
    Selector::parse(expression).resolve(descriptor)
}
