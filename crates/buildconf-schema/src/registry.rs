//! Schema registry.
//!
//! Holds the immutable, ordered set of option descriptors. Built once and
//! shared read-only afterwards.

use buildconf_hooks::LifecyclePoint;
use regex_lite::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use crate::descriptor::{LifecycleHookDescriptor, OptionDescriptor};
use crate::error::SchemaError;
use crate::value::{ConfigValue, ValueKind};

fn option_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][A-Za-z0-9]*$").expect("valid option name pattern"))
}

/// Versioned, ordered set of option descriptors.
#[derive(Debug)]
pub struct SchemaRegistry {
    schema_id: String,
    version: u32,
    options: Vec<OptionDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl SchemaRegistry {
    pub fn builder(schema_id: impl Into<String>, version: u32) -> SchemaBuilder {
        SchemaBuilder {
            schema_id: schema_id.into(),
            version,
            options: Vec::new(),
        }
    }

    /// The built-in build option table, initialized on first use.
    pub fn builtin() -> &'static SchemaRegistry {
        static BUILTIN: OnceLock<SchemaRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            crate::builtin::builder()
                .build()
                .expect("built-in option table is well-formed")
        })
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Descriptor for `name`.
    pub fn describe(&self, name: &str) -> Result<&OptionDescriptor, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownOption(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&OptionDescriptor> {
        self.index.get(name).map(|&i| &self.options[i])
    }

    /// Declaration position of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// All descriptors in declaration order.
    pub fn all_options(&self) -> &[OptionDescriptor] {
        &self.options
    }

    /// Lifecycle hook descriptors in declaration order.
    pub fn hooks(&self) -> impl Iterator<Item = LifecycleHookDescriptor> + '_ {
        self.options.iter().filter_map(OptionDescriptor::hook_descriptor)
    }

    pub fn hook_for(&self, point: LifecyclePoint) -> Option<LifecycleHookDescriptor> {
        self.hooks().find(|h| h.point == point)
    }

    /// Defaults of every option that declares one.
    pub fn defaults(&self) -> Defaults {
        let values = self
            .options
            .iter()
            .filter_map(|d| d.default_value().map(|v| (d.name(), v.clone())))
            .collect();
        Defaults { values }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Collects descriptors and checks them into a [`SchemaRegistry`].
#[derive(Debug)]
pub struct SchemaBuilder {
    schema_id: String,
    version: u32,
    options: Vec<OptionDescriptor>,
}

impl SchemaBuilder {
    pub fn option(mut self, descriptor: OptionDescriptor) -> Self {
        self.options.push(descriptor);
        self
    }

    /// Check names, defaults and hook bindings.
    pub fn build(self) -> Result<SchemaRegistry, SchemaError> {
        let mut index = HashMap::with_capacity(self.options.len());

        for (i, desc) in self.options.iter().enumerate() {
            let name = desc.name();

            if !option_name_pattern().is_match(name) {
                return Err(SchemaError::InvalidName(name.to_string()));
            }

            if index.insert(name, i).is_some() {
                return Err(SchemaError::DuplicateOption(name.to_string()));
            }

            if let Some(default) = desc.default_value() {
                // Hooks come from the user, never from the schema.
                let is_callback = matches!(default, ConfigValue::Callback(_));
                if is_callback || !default.matches(&desc.kind()) {
                    return Err(SchemaError::DefaultKindMismatch {
                        name: name.to_string(),
                        expected: desc.kind().to_string(),
                    });
                }
            }

            if matches!(desc.kind(), ValueKind::Callback(_)) && desc.lifecycle_point().is_none() {
                return Err(SchemaError::MissingLifecyclePoint(name.to_string()));
            }
        }

        tracing::debug!(
            schema_id = %self.schema_id,
            version = self.version,
            options = self.options.len(),
            "schema registry built"
        );

        Ok(SchemaRegistry {
            schema_id: self.schema_id,
            version: self.version,
            options: self.options,
            index,
        })
    }
}

/// Schema defaults, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    values: BTreeMap<&'static str, ConfigValue>,
}

impl Defaults {
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ConfigValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
