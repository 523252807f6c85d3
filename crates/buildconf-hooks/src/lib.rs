//! Lifecycle hook contract for build configuration.
//!
//! Hooks are user-supplied callbacks stored in a resolved configuration and
//! awaited by the build pipeline at a named lifecycle point. This crate only
//! types them: every hook, sync or async, is exposed as a cancellable future
//! so the pipeline can await all of them the same way.

mod error;
mod hook;
mod payload;
mod point;

pub use error::HookError;
pub use hook::{Hook, HookCall, HookResult};
pub use payload::{HookParams, HookPayload, PublishPayload};
pub use point::{HookSignature, LifecyclePoint};
