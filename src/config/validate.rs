//! Validation of untyped input against the schema registry.
//!
//! Validation is total: every key is checked and every problem reported, so
//! the user sees all of them in one pass. The raw input is never modified.

use buildconf_schema::{ActualKind, ConfigValue, OptionDescriptor, SchemaRegistry, ValueKind};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::raw::{RawConfig, RawValue};

/// Who is supplying the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Caller {
    #[default]
    User,
    /// The build pipeline, supplying its computed values.
    Pipeline,
}

/// How user-supplied values for dynamic options are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DynamicPolicy {
    /// Accept them; pipeline-computed values still take precedence.
    #[default]
    Permissive,
    /// Reject them with `NOT_USER_SETTABLE`.
    Strict,
}

/// What is wrong with one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldErrorKind {
    UnknownOption,
    TypeMismatch { expected: String, actual: String },
    NotUserSettable,
    InvalidVariant { value: String, allowed: Vec<String> },
}

/// A field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn unknown_option(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::UnknownOption,
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: ValueKind, actual: ActualKind) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::TypeMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            },
        }
    }

    pub fn not_user_settable(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::NotUserSettable,
        }
    }

    pub fn invalid_variant(field: impl Into<String>, value: &str, allowed: &[&str]) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::InvalidVariant {
                value: value.to_string(),
                allowed: allowed.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self.kind {
            FieldErrorKind::UnknownOption => "UNKNOWN_OPTION",
            FieldErrorKind::TypeMismatch { .. } => "TYPE_MISMATCH",
            FieldErrorKind::NotUserSettable => "NOT_USER_SETTABLE",
            FieldErrorKind::InvalidVariant { .. } => "INVALID_VARIANT",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::UnknownOption => write!(f, "{}: unknown option", self.field),
            FieldErrorKind::TypeMismatch { expected, actual } => {
                write!(f, "{}: expected {}, got {}", self.field, expected, actual)
            }
            FieldErrorKind::NotUserSettable => write!(
                f,
                "{}: computed by the build pipeline, not user-settable",
                self.field
            ),
            FieldErrorKind::InvalidVariant { value, allowed } => write!(
                f,
                "{}: '{}' is not one of {}",
                self.field,
                value,
                allowed.join(", ")
            ),
        }
    }
}

/// Every problem found in one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Typed partial configuration.
///
/// Only the validator produces non-empty values, so anything handed to the
/// merger has been checked against the schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl ValidatedConfig {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_values(values: BTreeMap<String, ConfigValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn into_values(self) -> impl Iterator<Item = (String, ConfigValue)> {
        self.values.into_iter()
    }
}

/// Outcome of [`Validator::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid(ValidatedConfig),
    Invalid(FieldErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Errors found; empty when valid.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid(errors) => errors.errors(),
        }
    }

    pub fn into_result(self) -> Result<ValidatedConfig, FieldErrors> {
        match self {
            Self::Valid(config) => Ok(config),
            Self::Invalid(errors) => Err(errors),
        }
    }
}

/// Checks raw input against a [`SchemaRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
    caller: Caller,
    policy: DynamicPolicy,
}

impl<'a> Validator<'a> {
    /// Validator for user input with the permissive dynamic policy.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            caller: Caller::User,
            policy: DynamicPolicy::Permissive,
        }
    }

    /// Validator for values computed by the pipeline itself.
    pub fn for_pipeline(registry: &'a SchemaRegistry) -> Self {
        Self {
            caller: Caller::Pipeline,
            ..Self::new(registry)
        }
    }

    pub fn with_policy(mut self, policy: DynamicPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn caller(&self) -> Caller {
        self.caller
    }

    pub fn policy(&self) -> DynamicPolicy {
        self.policy
    }

    pub fn validate(&self, raw: &RawConfig) -> ValidationResult {
        let mut values = BTreeMap::new();
        let mut errors = Vec::new();

        for (key, raw_value) in raw.iter() {
            let Some(desc) = self.registry.get(key) else {
                errors.push(FieldError::unknown_option(key));
                continue;
            };

            if desc.mutability().is_dynamic()
                && self.caller == Caller::User
                && self.policy == DynamicPolicy::Strict
            {
                errors.push(FieldError::not_user_settable(key));
                continue;
            }

            if let Some(value) = check_value(desc, raw_value, &mut errors) {
                values.insert(key.to_string(), value);
            }
        }

        if errors.is_empty() {
            tracing::debug!(
                caller = ?self.caller,
                fields = values.len(),
                "configuration valid"
            );
            ValidationResult::Valid(ValidatedConfig { values })
        } else {
            tracing::warn!(
                caller = ?self.caller,
                errors = errors.len(),
                "configuration invalid"
            );
            ValidationResult::Invalid(FieldErrors { errors })
        }
    }
}

/// Type one value, recording every problem found in it.
fn check_value(
    desc: &OptionDescriptor,
    raw: &RawValue,
    errors: &mut Vec<FieldError>,
) -> Option<ConfigValue> {
    let name = desc.name();

    match (desc.kind(), raw) {
        (ValueKind::Boolean, RawValue::Data(Value::Bool(b))) => Some(ConfigValue::Bool(*b)),
        (ValueKind::String, RawValue::Data(Value::String(s))) => {
            Some(ConfigValue::String(s.clone()))
        }
        (ValueKind::Object, RawValue::Data(Value::Object(map))) => {
            Some(ConfigValue::Object(map.clone()))
        }
        (ValueKind::StringList, RawValue::Data(Value::Array(items))) => {
            let before = errors.len();
            let mut list = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) => list.push(s.clone()),
                    other => errors.push(FieldError::type_mismatch(
                        format!("{name}[{i}]"),
                        ValueKind::String,
                        ActualKind::of_json(other),
                    )),
                }
            }
            (errors.len() == before).then_some(ConfigValue::StringList(list))
        }
        (ValueKind::Enum(variants), RawValue::Data(Value::String(s))) => {
            if variants.contains(&s.as_str()) {
                Some(ConfigValue::Choice(s.clone()))
            } else {
                errors.push(FieldError::invalid_variant(name, s, variants));
                None
            }
        }
        (ValueKind::Callback(signature), RawValue::Callback(hook))
            if hook.signature() == signature =>
        {
            Some(ConfigValue::Callback(hook.clone()))
        }
        (kind, other) => {
            errors.push(FieldError::type_mismatch(name, kind, other.actual_kind()));
            None
        }
    }
}
