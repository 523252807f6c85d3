//! Configuration merge logic
//!
//! Two merges live here:
//! - [`merge`] resolves validated layers field by field:
//!   dynamic overrides > user values > schema defaults.
//! - [`deep_merge`] layers raw documents (host file, project file, CLI
//!   overrides) before validation:
//!   - Objects: deep-merge by key
//!   - Arrays: REPLACE (last wins)
//!   - Scalars: override (last wins)

use buildconf_schema::Defaults;
use serde_json::Value;
use std::collections::BTreeMap;

use super::resolved::{ResolvedConfig, ResolvedEntry, ValueOrigin};
use super::validate::ValidatedConfig;

/// Resolve a configuration from its three layers.
///
/// Each option takes the value of the highest layer that supplies it. Values
/// are replaced whole: pass-through objects and lists are not combined, and a
/// hook slot keeps a single callback (no chaining).
pub fn merge(user: ValidatedConfig, dynamic: ValidatedConfig, defaults: &Defaults) -> ResolvedConfig {
    let mut entries: BTreeMap<String, ResolvedEntry> = defaults
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                ResolvedEntry {
                    value: value.clone(),
                    origin: ValueOrigin::Default,
                },
            )
        })
        .collect();

    let layers = [(user, ValueOrigin::User), (dynamic, ValueOrigin::Dynamic)];
    for (layer, origin) in layers {
        for (name, value) in layer.into_values() {
            entries.insert(name, ResolvedEntry { value, origin });
        }
    }

    ResolvedConfig::from_entries(entries)
}

/// Deep merge two JSON values.
///
/// Keys keep the position they first appeared at, so later layers never
/// reorder a document.
///
/// Merge semantics:
/// - Objects: deep-merge by key (recursive)
/// - Arrays: REPLACE (second wins entirely)
/// - Scalars: override (second wins)
/// - Null: override (null can override any value)
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.shift_remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }

        // Arrays and scalars: overlay wins
        (_, overlay) => overlay,
    }
}

/// Merge raw documents in order (first is base, last has highest precedence).
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers
        .into_iter()
        .fold(Value::Object(Default::default()), deep_merge)
}
