//! Option descriptors.

use buildconf_hooks::{HookSignature, LifecyclePoint};
use serde::Serialize;

use crate::value::{ConfigValue, ValueKind};

/// Who owns an option's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum Mutability {
    /// Freely user-settable.
    Static,
    /// Computed by the pipeline from context.
    ///
    /// When `overridable` is set the pipeline leaves the option alone if the
    /// user supplied it.
    Dynamic { overridable: bool },
}

impl Mutability {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }
}

/// Schema entry for one configuration key.
#[derive(Debug, Clone)]
pub struct OptionDescriptor {
    name: &'static str,
    kind: ValueKind,
    default: Option<ConfigValue>,
    mutability: Mutability,
    point: Option<LifecyclePoint>,
    description: &'static str,
}

impl OptionDescriptor {
    /// Static option without a default.
    pub fn new(name: &'static str, kind: ValueKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            default: None,
            mutability: Mutability::Static,
            point: None,
            description,
        }
    }

    /// Callback option awaited by the pipeline at `point`.
    pub fn hook(name: &'static str, point: LifecyclePoint, description: &'static str) -> Self {
        Self {
            point: Some(point),
            ..Self::new(name, ValueKind::Callback(point.signature()), description)
        }
    }

    pub fn with_default(mut self, value: impl Into<ConfigValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the option as pipeline-computed.
    pub fn dynamic(mut self, overridable: bool) -> Self {
        self.mutability = Mutability::Dynamic { overridable };
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn default_value(&self) -> Option<&ConfigValue> {
        self.default.as_ref()
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn lifecycle_point(&self) -> Option<LifecyclePoint> {
        self.point
    }

    /// Lifecycle view of a callback option.
    pub fn hook_descriptor(&self) -> Option<LifecycleHookDescriptor> {
        match (self.kind, self.point) {
            (ValueKind::Callback(signature), Some(point)) => Some(LifecycleHookDescriptor {
                option: self.name,
                point,
                signature,
                awaited: true,
            }),
            _ => None,
        }
    }
}

/// A callback option bound to the lifecycle point where it is awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifecycleHookDescriptor {
    pub option: &'static str,
    pub point: LifecyclePoint,
    pub signature: HookSignature,
    /// The pipeline suspends until the hook completes.
    pub awaited: bool,
}
