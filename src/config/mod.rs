//! Build configuration resolution
//!
//! Turns untyped input into a resolved configuration in three steps:
//! 1. Validate the raw input against the schema registry
//! 2. Compute dynamic overrides for the build context
//! 3. Merge dynamic overrides > user values > schema defaults

mod dynamic;
mod loader;
mod merge;
mod raw;
mod report;
mod resolved;
mod validate;

pub use dynamic::{BuildMode, DynamicContext};
pub use loader::{
    default_host_path, load_file, load_layers, parse_overrides, parse_str, Format, LayeredSource,
    LoadError, LoadedSource, SourceInfo, SourceOrigin,
};
pub use merge::{deep_merge, merge, merge_layers};
pub use raw::{RawConfig, RawValue};
pub use report::ResolutionReport;
pub use resolved::{DigestError, ResolvedConfig, ResolvedEntry, ResolvedExport, ValueOrigin, REDACTED};
pub use validate::{
    Caller, DynamicPolicy, FieldError, FieldErrorKind, FieldErrors, ValidatedConfig,
    ValidationResult, Validator,
};

use buildconf_schema::SchemaRegistry;

/// Validate `raw`, compute overrides for `context` and merge everything.
pub fn resolve(
    registry: &SchemaRegistry,
    raw: &RawConfig,
    context: DynamicContext,
    policy: DynamicPolicy,
) -> Result<ResolvedConfig, FieldErrors> {
    let user = Validator::new(registry)
        .with_policy(policy)
        .validate(raw)
        .into_result()?;
    let dynamic = context.overrides(registry, &user)?;

    let resolved = merge(user, dynamic, &registry.defaults());
    tracing::info!(
        mode = %context.mode,
        dev = context.dev,
        options = resolved.len(),
        "configuration resolved"
    );
    Ok(resolved)
}
