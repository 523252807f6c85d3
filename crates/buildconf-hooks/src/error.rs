//! Hook errors.

use crate::point::HookSignature;

/// Outcome of an awaited hook that did not complete successfully.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookError {
    #[error("hook expects a {expected} payload, got {actual}")]
    PayloadMismatch {
        expected: HookSignature,
        actual: HookSignature,
    },

    #[error("hook was aborted before completion")]
    Aborted,

    #[error("hook failed: {0}")]
    Failed(String),
}

impl HookError {
    /// Convenience for hook bodies reporting failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
