//! Hook payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::point::HookSignature;

/// Parameters passed to dev/build lifecycle hooks.
///
/// The content is defined by the pipeline; this crate carries it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookParams {
    /// Build mode the pipeline is running (e.g. "spa").
    pub mode: String,

    /// Whether this is a dev session rather than a production build.
    pub dev: bool,

    /// Data-only view of the resolved configuration.
    pub config: Value,
}

/// Payload passed to the publish hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPayload {
    /// Publish target argument given by the user.
    pub arg: String,

    /// Directory holding the built output.
    pub dist_dir: String,
}

/// Payload handed to [`Hook::call`](crate::Hook::call).
#[derive(Debug, Clone, PartialEq)]
pub enum HookPayload {
    Params(HookParams),
    Publish(PublishPayload),
}

impl HookPayload {
    pub fn signature(&self) -> HookSignature {
        match self {
            Self::Params(_) => HookSignature::Params,
            Self::Publish(_) => HookSignature::Publish,
        }
    }
}

impl From<HookParams> for HookPayload {
    fn from(params: HookParams) -> Self {
        Self::Params(params)
    }
}

impl From<PublishPayload> for HookPayload {
    fn from(payload: PublishPayload) -> Self {
        Self::Publish(payload)
    }
}
