//! Resolved configuration with per-value provenance
//!
//! The resolved configuration is what the build pipeline consumes for one
//! invocation. It is never shared across invocations.

use buildconf_hooks::{Hook, LifecyclePoint};
use buildconf_schema::{ConfigValue, SchemaRegistry};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use super::validate::ValidatedConfig;

/// Layer a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueOrigin {
    Default,
    User,
    Dynamic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub value: ConfigValue,
    pub origin: ValueOrigin,
}

/// Keys that contain secrets and are redacted from exports
const SECRET_KEYS: &[&str] = &[
    "password",
    "token",
    "secret",
    "private_key",
    "api_key",
    "apikey",
    "credential",
];

/// Placeholder written in place of redacted values
pub const REDACTED: &str = "[REDACTED]";

/// Final merged configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    entries: BTreeMap<String, ResolvedEntry>,
}

impl ResolvedConfig {
    pub(crate) fn from_entries(entries: BTreeMap<String, ResolvedEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.entries.get(name).map(|e| &e.value)
    }

    pub fn entry(&self, name: &str) -> Option<&ResolvedEntry> {
        self.entries.get(name)
    }

    pub fn origin(&self, name: &str) -> Option<ValueOrigin> {
        self.entries.get(name).map(|e| e.origin)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ConfigValue::as_bool)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ConfigValue::as_str)
    }

    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(ConfigValue::as_list)
    }

    pub fn get_object(&self, name: &str) -> Option<&Map<String, Value>> {
        self.get(name).and_then(ConfigValue::as_object)
    }

    /// Hook stored for `point`, if the user (or pipeline) supplied one.
    pub fn hook(&self, registry: &SchemaRegistry, point: LifecyclePoint) -> Option<&Hook> {
        let descriptor = registry.hook_for(point)?;
        self.get(descriptor.option).and_then(ConfigValue::as_hook)
    }

    /// Values without provenance.
    pub fn values(&self) -> BTreeMap<&str, &ConfigValue> {
        self.entries
            .iter()
            .map(|(k, e)| (k.as_str(), &e.value))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-enter the resolved values as a validated layer.
    pub fn to_validated(&self) -> ValidatedConfig {
        ValidatedConfig::from_values(
            self.entries
                .iter()
                .map(|(k, e)| (k.clone(), e.value.clone()))
                .collect(),
        )
    }

    /// Data-only view: every non-callback value, unredacted.
    pub fn data(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .filter_map(|(k, e)| e.value.to_json().map(|v| (k.clone(), v)))
            .collect()
    }

    /// Lifecycle points that have a hook attached, with the option holding it.
    pub fn attached_hooks(&self, registry: &SchemaRegistry) -> BTreeMap<LifecyclePoint, &'static str> {
        registry
            .hooks()
            .filter(|h| self.entries.contains_key(h.option))
            .map(|h| (h.point, h.option))
            .collect()
    }

    /// Export for display and logs, with secret-looking values redacted.
    pub fn to_json(&self, registry: &SchemaRegistry) -> ResolvedExport {
        let mut config = Value::Object(self.data());
        let redactions = redact_secrets(&mut config);

        let origins = self
            .entries
            .iter()
            .map(|(k, e)| (k.clone(), e.origin))
            .collect();

        ResolvedExport {
            schema_id: registry.schema_id().to_string(),
            schema_version: registry.version(),
            config,
            origins,
            hooks: self.attached_hooks(registry),
            redactions,
        }
    }

    /// SHA-256 of the canonical (RFC 8785) JSON of the data view and
    /// attached hook points.
    pub fn digest(&self, registry: &SchemaRegistry) -> Result<String, DigestError> {
        let input = serde_json::json!({
            "schema_id": registry.schema_id(),
            "config": Value::Object(self.data()),
            "hooks": self.attached_hooks(registry),
        });
        let jcs_bytes = serde_json_canonicalizer::to_vec(&input)
            .map_err(|e| DigestError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Canonical encoding of the resolved configuration failed.
#[derive(Debug, thiserror::Error)]
#[error("canonical JSON encoding failed: {0}")]
pub struct DigestError(String);

/// Serializable view of a [`ResolvedConfig`].
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedExport {
    pub schema_id: String,
    pub schema_version: u32,
    pub config: Value,
    pub origins: BTreeMap<String, ValueOrigin>,
    pub hooks: BTreeMap<LifecyclePoint, &'static str>,
    pub redactions: Vec<String>,
}

/// Redact secrets in place, returning the redacted key paths
fn redact_secrets(value: &mut Value) -> Vec<String> {
    let mut redactions = Vec::new();
    redact_recursive(value, String::new(), &mut redactions);
    redactions
}

fn redact_recursive(value: &mut Value, path: String, redactions: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                let key_lower = key.to_lowercase();
                let current_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };

                let is_secret = SECRET_KEYS.iter().any(|s| key_lower.contains(s));

                if is_secret && !val.is_object() && !val.is_array() {
                    *val = Value::String(REDACTED.to_string());
                    redactions.push(current_path);
                } else {
                    redact_recursive(val, current_path, redactions);
                }
            }
        }
        Value::Array(arr) => {
            for (i, val) in arr.iter_mut().enumerate() {
                redact_recursive(val, format!("{}[{}]", path, i), redactions);
            }
        }
        _ => {}
    }
}
