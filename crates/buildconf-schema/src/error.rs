//! Registry errors.

/// Errors raised while building or querying a schema registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("option '{0}' is declared more than once")]
    DuplicateOption(String),

    #[error("option name '{0}' must be a camelCase identifier")]
    InvalidName(String),

    #[error("default for option '{name}' is not a valid {expected}")]
    DefaultKindMismatch { name: String, expected: String },

    #[error("callback option '{0}' has no lifecycle point")]
    MissingLifecyclePoint(String),
}
