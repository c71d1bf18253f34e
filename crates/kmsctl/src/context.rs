//! Execution context: the validated inputs of one invocation.

use std::collections::BTreeMap;
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use serde_json::Value;

use crate::error::ValidationError;
use crate::operations::{InputKind, InputSpec, OperationDescriptor};
use crate::selector::{self, Projection};

/// A validated input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputValue {
    /// Free-form string.
    Str(String),
    /// Range-checked integer.
    Int(i64),
    /// Token from the input's allowed set.
    Token(&'static str),
}

impl InputValue {
    /// JSON rendering, used when echoing inputs back.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::Int(i) => Value::from(*i),
            Self::Token(t) => Value::String((*t).to_string()),
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Token(t) => f.write_str(t),
        }
    }
}

/// Unvalidated inputs as they come off the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    values: BTreeMap<String, String>,
    selector: Option<String>,
}

impl RawInput {
    /// No inputs, default selector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to the input `name`.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Set the output selector expression.
    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }
}

/// Immutable, validated snapshot of one invocation's inputs plus its
/// resolved output projection.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    descriptor: &'static OperationDescriptor,
    inputs: BTreeMap<&'static str, InputValue>,
    projection: Projection,
}

impl ExecutionContext {
    /// Validate `raw` against `descriptor`.
    ///
    /// Unknown names, missing required inputs, malformed or out-of-range
    /// values and unresolvable selectors are all rejected here, before any
    /// request exists. Absent optional integers take their declared default.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn build(
        descriptor: &'static OperationDescriptor,
        raw: RawInput,
    ) -> Result<Self, ValidationError> {
        let RawInput {
            mut values,
            selector,
        } = raw;

        if let Some(unknown) = values.keys().find(|name| descriptor.input(name).is_none()) {
            return Err(ValidationError::UnknownField(unknown.clone()));
        }

        let mut inputs = BTreeMap::new();
        for spec in descriptor.inputs {
            let supplied = values.remove(spec.name).filter(|value| !value.is_empty());
            match (supplied, spec.kind) {
                (Some(value), _) => {
                    inputs.insert(spec.name, bind(spec, value)?);
                }
                (None, _) if spec.required => {
                    return Err(ValidationError::MissingRequiredField(spec.name.to_string()));
                }
                (None, InputKind::Integer { default: Some(default), .. }) => {
                    inputs.insert(spec.name, InputValue::Int(default));
                }
                (None, _) => {}
            }
        }

        let projection = selector::resolve(selector.as_deref().unwrap_or_default(), descriptor)?;

        Ok(Self {
            descriptor,
            inputs,
            projection,
        })
    }

    /// The operation this context was validated for.
    #[must_use]
    pub const fn descriptor(&self) -> &'static OperationDescriptor {
        self.descriptor
    }

    /// Every bound input, defaults included.
    #[must_use]
    pub const fn inputs(&self) -> &BTreeMap<&'static str, InputValue> {
        &self.inputs
    }

    /// The resolved output projection.
    #[must_use]
    pub const fn projection(&self) -> Projection {
        self.projection
    }

    /// A bound string input.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.inputs.get(name)? {
            InputValue::Str(s) => Some(s),
            InputValue::Token(t) => Some(t),
            InputValue::Int(_) => None,
        }
    }

    /// A bound string input that the operation declares as required.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingRequiredField`] if it is not bound.
    pub fn required_str(&self, name: &str) -> Result<&str, ValidationError> {
        self.str(name)
            .ok_or_else(|| ValidationError::MissingRequiredField(name.to_string()))
    }

    /// A bound integer input.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.inputs.get(name)? {
            InputValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// A bound token input, parsed into its wire type.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidValue`] if the token does not parse.
    pub fn parsed<T>(&self, name: &str) -> Result<Option<T>, ValidationError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.str(name)
            .map(|token| {
                token.parse::<T>().map_err(|e| ValidationError::InvalidValue {
                    field: name.to_string(),
                    value: token.to_string(),
                    expected: e.to_string(),
                })
            })
            .transpose()
    }

    /// Human readable description of the affected resource, built from the
    /// operation's identifying inputs.
    #[must_use]
    pub fn target(&self) -> String {
        let parts: Vec<String> = self
            .descriptor
            .target_fields
            .iter()
            .filter_map(|field| self.inputs.get(field).map(|value| format!("{field}={value}")))
            .collect();
        if parts.is_empty() {
            format!("new {} request", self.descriptor.operation)
        } else {
            parts.join(", ")
        }
    }
}

fn bind(spec: &InputSpec, value: String) -> Result<InputValue, ValidationError> {
    match spec.kind {
        InputKind::Text => Ok(InputValue::Str(value)),
        InputKind::Integer { min, max, .. } => {
            let parsed = match value.trim().parse::<i64>() {
                Ok(parsed) => parsed,
                // Too large to represent is still out of range.
                Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
                Err(e) if *e.kind() == IntErrorKind::NegOverflow => i64::MIN,
                Err(_) => {
                    return Err(ValidationError::InvalidValue {
                        field: spec.name.to_string(),
                        value,
                        expected: "an integer".into(),
                    });
                }
            };
            if !(min..=max).contains(&parsed) {
                return Err(ValidationError::OutOfRange {
                    field: spec.name.to_string(),
                    value: parsed,
                    min,
                    max,
                });
            }
            Ok(InputValue::Int(parsed))
        }
        InputKind::Token(tokens) => tokens
            .iter()
            .copied()
            .find(|token| *token == value)
            .map(InputValue::Token)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: spec.name.to_string(),
                value,
                expected: format!("one of {}", tokens.join(", ")),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::find;
    use proptest::prelude::*;

    fn list_keys() -> &'static OperationDescriptor {
        find("list-keys").expect("registered")
    }

    #[test]
    fn missing_required_field_is_named() {
        let err = ExecutionContext::build(find("get-key").expect("registered"), RawInput::new())
            .expect_err("should fail");
        assert_eq!(err, ValidationError::MissingRequiredField("KeyId".into()));
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let err = ExecutionContext::build(
            find("delete-alias").expect("registered"),
            RawInput::new().with_value("AliasName", ""),
        )
        .expect_err("should fail");
        assert_eq!(err, ValidationError::MissingRequiredField("AliasName".into()));
    }

    #[test]
    fn page_size_defaults_to_fifty() {
        let ctx = ExecutionContext::build(list_keys(), RawInput::new()).expect("valid");
        assert_eq!(ctx.int("Limit"), Some(50));
        assert_eq!(ctx.str("Marker"), None);
    }

    #[test]
    fn optional_without_default_stays_unbound() {
        let ctx = ExecutionContext::build(
            find("schedule-key-deletion").expect("registered"),
            RawInput::new().with_value("KeyId", "k1"),
        )
        .expect("valid");
        assert!(!ctx.inputs().contains_key("PendingWindowInDays"));
    }

    #[test]
    fn non_numeric_integer_is_invalid() {
        let err = ExecutionContext::build(list_keys(), RawInput::new().with_value("Limit", "ten"))
            .expect_err("should fail");
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "Limit"));
    }

    #[test]
    fn oversized_page_size_reports_out_of_range() {
        let err = ExecutionContext::build(
            list_keys(),
            RawInput::new().with_value("Limit", "99999999999999999999"),
        )
        .expect_err("should fail");
        assert_eq!(err.to_string(), format!("Limit must be between 1 and 100, got {}", i64::MAX));
    }

    #[test]
    fn unknown_token_lists_allowed_values() {
        let err = ExecutionContext::build(
            find("create-key").expect("registered"),
            RawInput::new().with_value("KeyUsage", "ENCRYPT"),
        )
        .expect_err("should fail");
        assert!(err.to_string().contains("ENCRYPT_DECRYPT"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = ExecutionContext::build(
            find("get-key").expect("registered"),
            RawInput::new().with_value("KeyId", "k").with_value("AliasName", "alias/x"),
        )
        .expect_err("should fail");
        assert_eq!(err, ValidationError::UnknownField("AliasName".into()));
    }

    #[test]
    fn invalid_selector_fails_at_build_time() {
        let err = ExecutionContext::build(
            find("get-key").expect("registered"),
            RawInput::new().with_value("KeyId", "k").with_selector("Nope"),
        )
        .expect_err("should fail");
        assert!(matches!(err, ValidationError::InvalidSelector { .. }));
    }

    #[test]
    fn target_uses_identifying_fields() {
        let ctx = ExecutionContext::build(
            find("create-alias").expect("registered"),
            RawInput::new()
                .with_value("AliasName", "alias/app")
                .with_value("TargetKeyId", "1234abcd"),
        )
        .expect("valid");
        assert_eq!(ctx.target(), "AliasName=alias/app, TargetKeyId=1234abcd");
    }

    #[test]
    fn target_falls_back_to_operation() {
        let ctx = ExecutionContext::build(find("create-key").expect("registered"), RawInput::new())
            .expect("valid");
        assert_eq!(ctx.target(), "new CreateKey request");
    }

    #[test]
    fn context_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExecutionContext>();
    }

    proptest! {
        #[test]
        fn prop_page_size_in_range_is_accepted(limit in 1i64..=100) {
            let ctx = ExecutionContext::build(
                list_keys(),
                RawInput::new().with_value("Limit", limit.to_string()),
            );
            prop_assert_eq!(ctx.expect("valid").int("Limit"), Some(limit));
        }

        #[test]
        fn prop_page_size_beyond_i64_is_out_of_range(extra in "[0-9]{1,6}", negative in any::<bool>()) {
            let digits = format!("99999999999999999999{extra}");
            let (text, clamped) = if negative {
                (format!("-{digits}"), i64::MIN)
            } else {
                (digits, i64::MAX)
            };
            let err = ExecutionContext::build(list_keys(), RawInput::new().with_value("Limit", text))
                .expect_err("should fail");
            prop_assert_eq!(
                err,
                ValidationError::OutOfRange { field: "Limit".into(), value: clamped, min: 1, max: 100 }
            );
        }

        #[test]
        fn prop_page_size_out_of_range_is_rejected(
            limit in prop_oneof![i64::MIN / 2..=0i64, 101i64..=i64::MAX / 2]
        ) {
            let err = ExecutionContext::build(
                list_keys(),
                RawInput::new().with_value("Limit", limit.to_string()),
            )
            .expect_err("should fail");
            prop_assert_eq!(
                err,
                ValidationError::OutOfRange { field: "Limit".into(), value: limit, min: 1, max: 100 }
            );
        }
    }
}
