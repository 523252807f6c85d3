//! Lifecycle points and hook signatures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named point in the build/dev process at which the pipeline awaits a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecyclePoint {
    /// Before the dev server starts.
    BeforeDev,
    /// After the dev server has started.
    AfterDev,
    /// Before a production build starts.
    BeforeBuild,
    /// After a production build completes.
    AfterBuild,
    /// When the user requests a publish of the built output.
    OnPublish,
}

impl LifecyclePoint {
    /// All points, in the order the pipeline reaches them.
    pub const ALL: [LifecyclePoint; 5] = [
        LifecyclePoint::BeforeDev,
        LifecyclePoint::AfterDev,
        LifecyclePoint::BeforeBuild,
        LifecyclePoint::AfterBuild,
        LifecyclePoint::OnPublish,
    ];

    /// Stable machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeforeDev => "before-dev",
            Self::AfterDev => "after-dev",
            Self::BeforeBuild => "before-build",
            Self::AfterBuild => "after-build",
            Self::OnPublish => "on-publish",
        }
    }

    /// Payload shape the pipeline passes at this point.
    pub fn signature(&self) -> HookSignature {
        match self {
            Self::OnPublish => HookSignature::Publish,
            _ => HookSignature::Params,
        }
    }
}

impl fmt::Display for LifecyclePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argument shape a hook accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookSignature {
    /// Receives [`HookParams`](crate::HookParams).
    Params,
    /// Receives [`PublishPayload`](crate::PublishPayload).
    Publish,
}

impl fmt::Display for HookSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Params => write!(f, "params"),
            Self::Publish => write!(f, "publish"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_publish_takes_publish_payload() {
        for point in LifecyclePoint::ALL {
            let expected = if point == LifecyclePoint::OnPublish {
                HookSignature::Publish
            } else {
                HookSignature::Params
            };
            assert_eq!(point.signature(), expected, "{}", point);
        }
    }

    #[test]
    fn test_point_serde_matches_display() {
        let json = serde_json::to_string(&LifecyclePoint::BeforeBuild).unwrap();
        assert_eq!(json, "\"before-build\"");
        assert_eq!(LifecyclePoint::BeforeBuild.to_string(), "before-build");
    }
}
