//! Resolution report printed by `buildconf resolve`.

use buildconf_schema::SchemaRegistry;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::dynamic::DynamicContext;
use super::loader::SourceInfo;
use super::resolved::{DigestError, ResolvedConfig, ResolvedExport};

/// A resolved configuration with its provenance
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    /// When this resolution was computed
    pub created_at: DateTime<Utc>,

    pub context: DynamicContext,

    /// Contributing sources in precedence order
    pub sources: Vec<SourceInfo>,

    /// Canonical digest of the resolved values
    pub digest: String,

    pub resolved: ResolvedExport,
}

impl ResolutionReport {
    pub fn new(
        registry: &SchemaRegistry,
        resolved: &ResolvedConfig,
        context: DynamicContext,
        sources: Vec<SourceInfo>,
    ) -> Result<Self, DigestError> {
        Ok(Self {
            created_at: Utc::now(),
            context,
            sources,
            digest: resolved.digest(registry)?,
            resolved: resolved.to_json(registry),
        })
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, BuildMode, DynamicPolicy, RawConfig};
    use serde_json::json;

    #[test]
    fn test_report_shape() {
        let registry = SchemaRegistry::builtin();
        let raw = RawConfig::new().with("gzip", json!(true));
        let context = DynamicContext::new(BuildMode::Spa, false);
        let resolved = resolve(registry, &raw, context, DynamicPolicy::Permissive).unwrap();

        let report = ResolutionReport::new(registry, &resolved, context, Vec::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["context"]["mode"], "spa");
        assert_eq!(value["resolved"]["config"]["distDir"], "dist/spa");
        assert_eq!(value["resolved"]["origins"]["distDir"], "dynamic");
        assert_eq!(value["resolved"]["schema_id"], registry.schema_id());
        assert_eq!(value["digest"].as_str().map(str::len), Some(64));
    }
}
