//! Untyped configuration input.

use buildconf_hooks::Hook;
use buildconf_schema::ActualKind;
use serde_json::{Map, Value};

/// One untyped input value: parsed data or a programmatically attached hook.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Data(Value),
    Callback(Hook),
}

impl RawValue {
    pub fn actual_kind(&self) -> ActualKind {
        match self {
            Self::Data(value) => ActualKind::of_json(value),
            Self::Callback(hook) => ActualKind::Callback(hook.signature()),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl From<Hook> for RawValue {
    fn from(hook: Hook) -> Self {
        Self::Callback(hook)
    }
}

/// User-supplied partial configuration, keys in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConfig {
    entries: Vec<(String, RawValue)>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every key of a parsed JSON/TOML document.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(k, v)| (k, RawValue::Data(v)))
                .collect(),
        }
    }

    /// Set `key`, replacing an earlier value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_hook(self, key: impl Into<String>, hook: Hook) -> Self {
        self.with(key, RawValue::Callback(hook))
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
