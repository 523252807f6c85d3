//! Value kinds and typed configuration values.

use buildconf_hooks::{Hook, HookSignature};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of value an option accepts. Fixed once the registry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Boolean,
    String,
    StringList,
    /// A hook slot holding a single callback of the given signature.
    Callback(HookSignature),
    /// Pass-through options object for a third-party loader or plugin.
    Object,
    /// A string restricted to the listed variants.
    Enum(&'static [&'static str]),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::String => write!(f, "string"),
            Self::StringList => write!(f, "string-list"),
            Self::Callback(sig) => write!(f, "callback({})", sig),
            Self::Object => write!(f, "object"),
            Self::Enum(variants) => write!(f, "enum({})", variants.join("|")),
        }
    }
}

impl Serialize for ValueKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Kind observed in untyped input, reported on mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActualKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
    Callback(HookSignature),
}

impl ActualKind {
    pub fn of_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for ActualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Array => write!(f, "array"),
            Self::Object => write!(f, "object"),
            Self::Callback(sig) => write!(f, "callback({})", sig),
        }
    }
}

impl Serialize for ActualKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A typed configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    String(String),
    StringList(Vec<String>),
    /// One of an enumerated option's variants.
    Choice(String),
    Object(Map<String, Value>),
    Callback(Hook),
}

impl ConfigValue {
    /// Whether this value conforms to `kind`.
    pub fn matches(&self, kind: &ValueKind) -> bool {
        match (self, kind) {
            (Self::Bool(_), ValueKind::Boolean) => true,
            (Self::String(_), ValueKind::String) => true,
            (Self::StringList(_), ValueKind::StringList) => true,
            (Self::Choice(v), ValueKind::Enum(variants)) => variants.contains(&v.as_str()),
            (Self::Object(_), ValueKind::Object) => true,
            (Self::Callback(hook), ValueKind::Callback(sig)) => hook.signature() == *sig,
            _ => false,
        }
    }

    /// JSON form of data values. Callbacks have none.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Bool(b) => Some(Value::Bool(*b)),
            Self::String(s) | Self::Choice(s) => Some(Value::String(s.clone())),
            Self::StringList(items) => Some(Value::Array(
                items.iter().cloned().map(Value::String).collect(),
            )),
            Self::Object(map) => Some(Value::Object(map.clone())),
            Self::Callback(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String content of a string or enumerated value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::StringList(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_hook(&self) -> Option<&Hook> {
        match self {
            Self::Callback(hook) => Some(hook),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Hook> for ConfigValue {
    fn from(hook: Hook) -> Self {
        Self::Callback(hook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(ValueKind::StringList.to_string(), "string-list");
        assert_eq!(
            ValueKind::Callback(HookSignature::Publish).to_string(),
            "callback(publish)"
        );
        assert_eq!(ValueKind::Enum(&["hash", "history"]).to_string(), "enum(hash|history)");
    }

    #[test]
    fn test_choice_must_be_a_variant() {
        let kind = ValueKind::Enum(&["hash", "history"]);
        assert!(ConfigValue::Choice("hash".to_string()).matches(&kind));
        assert!(!ConfigValue::Choice("memory".to_string()).matches(&kind));
        assert!(!ConfigValue::String("hash".to_string()).matches(&kind));
    }

    #[test]
    fn test_callback_signature_must_match() {
        let hook = Hook::publish_sync(|_| Ok(()));
        let value = ConfigValue::Callback(hook);
        assert!(value.matches(&ValueKind::Callback(HookSignature::Publish)));
        assert!(!value.matches(&ValueKind::Callback(HookSignature::Params)));
        assert!(value.to_json().is_none());
    }

    #[test]
    fn test_actual_kind_of_json() {
        assert_eq!(ActualKind::of_json(&serde_json::json!(1)), ActualKind::Number);
        assert_eq!(ActualKind::of_json(&serde_json::json!("x")), ActualKind::String);
        assert_eq!(ActualKind::of_json(&Value::Null).to_string(), "null");
    }
}
