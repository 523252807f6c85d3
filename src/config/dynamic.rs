//! Pipeline-computed option values.
//!
//! Dynamic options depend on the build mode, which a static configuration
//! file cannot know. The pipeline computes them here and hands them to
//! [`merge`](super::merge::merge) as the highest-precedence layer.

use buildconf_schema::{Mutability, SchemaRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use super::raw::RawConfig;
use super::validate::{FieldErrors, ValidatedConfig, Validator};

/// Target the app is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Spa,
    Pwa,
    Ssr,
    Cordova,
    Capacitor,
    Electron,
    Bex,
}

impl BuildMode {
    pub const ALL: [BuildMode; 7] = [
        BuildMode::Spa,
        BuildMode::Pwa,
        BuildMode::Ssr,
        BuildMode::Cordova,
        BuildMode::Capacitor,
        BuildMode::Electron,
        BuildMode::Bex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spa => "spa",
            Self::Pwa => "pwa",
            Self::Ssr => "ssr",
            Self::Cordova => "cordova",
            Self::Capacitor => "capacitor",
            Self::Electron => "electron",
            Self::Bex => "bex",
        }
    }

    /// Served over HTTP, as opposed to loaded from a bundled file system.
    pub fn is_web(&self) -> bool {
        matches!(self, Self::Spa | Self::Pwa | Self::Ssr)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let modes: Vec<_> = Self::ALL.iter().map(|m| m.as_str()).collect();
                format!("unknown build mode '{}': expected one of {}", s, modes.join(", "))
            })
    }
}

/// Context the pipeline computes dynamic values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DynamicContext {
    pub mode: BuildMode,
    pub dev: bool,
}

impl DynamicContext {
    pub fn new(mode: BuildMode, dev: bool) -> Self {
        Self { mode, dev }
    }

    /// Compute dynamic overrides for this context.
    ///
    /// Only options the registry declares as dynamic are computed. Overridable
    /// options the user already set are kept, except `publicPath` in a dev
    /// session, which is served from `/` unless `forceDevPublicPath` is set.
    pub fn overrides(
        &self,
        registry: &SchemaRegistry,
        user: &ValidatedConfig,
    ) -> Result<ValidatedConfig, FieldErrors> {
        let mut computed = RawConfig::new();
        let mut offer = |name: &str, value: Value, replace_user: bool| {
            let Some(desc) = registry.get(name) else {
                return;
            };
            if !desc.mutability().is_dynamic() {
                return;
            }
            let overridable = desc.mutability() == (Mutability::Dynamic { overridable: true });
            if overridable && !replace_user && user.contains(name) {
                tracing::debug!(option = name, "keeping user override");
                return;
            }
            tracing::debug!(option = name, %value, mode = %self.mode, dev = self.dev, "computed dynamic value");
            computed.set(name, value);
        };

        let force_dev_path = user
            .get("forceDevPublicPath")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let dev_path = self.dev && !force_dev_path;

        let public_path = match user.get("publicPath").and_then(|v| v.as_str()) {
            _ if dev_path => "/".to_string(),
            Some(path) => path.to_string(),
            None if self.mode.is_web() || self.dev => "/".to_string(),
            None => String::new(),
        };

        offer("distDir", json!(format!("dist/{}", self.mode)), false);
        offer("publicPath", json!(public_path), dev_path);
        offer("appBase", json!(public_path), false);
        offer("vueRouterBase", json!(public_path), false);
        offer("htmlFilename", json!("index.html"), false);
        if self.mode == BuildMode::Ssr {
            offer("ssrPwaHtmlFilename", json!("offline.html"), false);
        }

        Validator::for_pipeline(registry).validate(&computed).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildconf_schema::ConfigValue;

    fn user(raw: RawConfig) -> ValidatedConfig {
        Validator::new(SchemaRegistry::builtin())
            .validate(&raw)
            .into_result()
            .unwrap()
    }

    #[test]
    fn test_dist_dir_follows_mode() {
        let ctx = DynamicContext::new(BuildMode::Spa, false);
        let overrides = ctx
            .overrides(SchemaRegistry::builtin(), &ValidatedConfig::empty())
            .unwrap();

        assert_eq!(
            overrides.get("distDir"),
            Some(&ConfigValue::String("dist/spa".to_string()))
        );
        assert_eq!(
            overrides.get("publicPath"),
            Some(&ConfigValue::String("/".to_string()))
        );
        assert!(overrides.get("ssrPwaHtmlFilename").is_none());
    }

    #[test]
    fn test_overridable_user_value_kept() {
        let ctx = DynamicContext::new(BuildMode::Pwa, false);
        let user = user(RawConfig::new().with("distDir", json!("public/app")));
        let overrides = ctx.overrides(SchemaRegistry::builtin(), &user).unwrap();

        assert!(overrides.get("distDir").is_none());
    }

    #[test]
    fn test_non_overridable_always_computed() {
        let ctx = DynamicContext::new(BuildMode::Spa, false);
        let user = user(RawConfig::new().with("htmlFilename", json!("app.html")));
        let overrides = ctx.overrides(SchemaRegistry::builtin(), &user).unwrap();

        assert_eq!(
            overrides.get("htmlFilename"),
            Some(&ConfigValue::String("index.html".to_string()))
        );
    }

    #[test]
    fn test_router_base_follows_user_public_path() {
        let ctx = DynamicContext::new(BuildMode::Spa, false);
        let user = user(RawConfig::new().with("publicPath", json!("/app/")));
        let overrides = ctx.overrides(SchemaRegistry::builtin(), &user).unwrap();

        assert!(overrides.get("publicPath").is_none());
        assert_eq!(
            overrides.get("vueRouterBase"),
            Some(&ConfigValue::String("/app/".to_string()))
        );
        assert_eq!(
            overrides.get("appBase"),
            Some(&ConfigValue::String("/app/".to_string()))
        );
    }

    #[test]
    fn test_bundled_modes_use_relative_paths() {
        let ctx = DynamicContext::new(BuildMode::Electron, false);
        let overrides = ctx
            .overrides(SchemaRegistry::builtin(), &ValidatedConfig::empty())
            .unwrap();

        assert_eq!(overrides.get("publicPath"), Some(&ConfigValue::String(String::new())));
        assert_eq!(
            overrides.get("distDir"),
            Some(&ConfigValue::String("dist/electron".to_string()))
        );
    }

    #[test]
    fn test_ssr_gets_offline_fallback() {
        let ctx = DynamicContext::new(BuildMode::Ssr, true);
        let overrides = ctx
            .overrides(SchemaRegistry::builtin(), &ValidatedConfig::empty())
            .unwrap();

        assert!(overrides.get("ssrPwaHtmlFilename").is_some());
    }

    #[test]
    fn test_registry_without_dynamic_options() {
        use buildconf_schema::{OptionDescriptor, ValueKind};
        let registry = SchemaRegistry::builder("test/options@1", 1)
            .option(OptionDescriptor::new("gzip", ValueKind::Boolean, "gzip"))
            .build()
            .unwrap();

        let overrides = DynamicContext::new(BuildMode::Spa, false)
            .overrides(&registry, &ValidatedConfig::empty())
            .unwrap();
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_static_option_never_computed() {
        use buildconf_schema::{OptionDescriptor, ValueKind};
        let registry = SchemaRegistry::builder("test/options@1", 1)
            .option(OptionDescriptor::new("distDir", ValueKind::String, "out").with_default("dist"))
            .build()
            .unwrap();
        let user = Validator::new(&registry)
            .validate(&RawConfig::new().with("distDir", json!("mine")))
            .into_result()
            .unwrap();

        let overrides = DynamicContext::new(BuildMode::Spa, false)
            .overrides(&registry, &user)
            .unwrap();
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_dev_session_serves_from_root() {
        let ctx = DynamicContext::new(BuildMode::Spa, true);
        let user = user(RawConfig::new().with("publicPath", json!("/app/")));
        let overrides = ctx.overrides(SchemaRegistry::builtin(), &user).unwrap();

        assert_eq!(
            overrides.get("publicPath"),
            Some(&ConfigValue::String("/".to_string()))
        );
        assert_eq!(
            overrides.get("vueRouterBase"),
            Some(&ConfigValue::String("/".to_string()))
        );
    }

    #[test]
    fn test_dev_session_with_forced_public_path() {
        let ctx = DynamicContext::new(BuildMode::Spa, true);
        let user = user(
            RawConfig::new()
                .with("publicPath", json!("/app/"))
                .with("forceDevPublicPath", json!(true)),
        );
        let overrides = ctx.overrides(SchemaRegistry::builtin(), &user).unwrap();

        assert!(overrides.get("publicPath").is_none());
        assert_eq!(
            overrides.get("vueRouterBase"),
            Some(&ConfigValue::String("/app/".to_string()))
        );
    }

    #[test]
    fn test_dev_session_of_bundled_mode_uses_dev_server() {
        let ctx = DynamicContext::new(BuildMode::Cordova, true);
        let overrides = ctx
            .overrides(SchemaRegistry::builtin(), &ValidatedConfig::empty())
            .unwrap();

        assert_eq!(
            overrides.get("publicPath"),
            Some(&ConfigValue::String("/".to_string()))
        );
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("capacitor".parse::<BuildMode>(), Ok(BuildMode::Capacitor));
        assert!("desktop".parse::<BuildMode>().unwrap_err().contains("unknown build mode"));
    }
}
