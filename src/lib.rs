//! buildconf - build configuration schema, validator and merger
//!
//! This crate resolves the build configuration of a single-page app build
//! tool: it validates user input against a versioned option schema, merges
//! it with schema defaults and pipeline-computed values, and hands the
//! resolved configuration (including lifecycle hooks) to the build pipeline.

pub mod config;
pub mod docs;

pub use buildconf_hooks as hooks;
pub use buildconf_schema as schema;

pub use config::{
    merge, resolve, BuildMode, DynamicContext, DynamicPolicy, FieldError, FieldErrors, RawConfig,
    ResolvedConfig, ValidatedConfig, ValidationResult, Validator,
};
pub use schema::SchemaRegistry;
