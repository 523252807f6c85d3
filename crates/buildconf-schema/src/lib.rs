//! Versioned schema of build configuration options.
//!
//! The registry is the single source of truth for which keys a build
//! configuration may contain, the kind of value each accepts, its default,
//! and whether the pipeline computes it. Consumers query the registry
//! explicitly rather than extending a foreign configuration type.

mod builtin;
mod descriptor;
mod error;
mod registry;
mod value;

pub use builtin::{BUILTIN_SCHEMA_ID, BUILTIN_SCHEMA_VERSION, ROUTER_MODES};
pub use descriptor::{LifecycleHookDescriptor, Mutability, OptionDescriptor};
pub use error::SchemaError;
pub use registry::{Defaults, SchemaBuilder, SchemaRegistry};
pub use value::{ActualKind, ConfigValue, ValueKind};
