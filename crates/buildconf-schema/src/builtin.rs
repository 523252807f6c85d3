//! Built-in build option table.
//!
//! Static options are the user's to set. Dynamic options are computed by the
//! pipeline from the build mode; some of them may still be overridden by the
//! user, at their own risk.

use buildconf_hooks::LifecyclePoint;
use serde_json::Map;

use crate::descriptor::OptionDescriptor;
use crate::registry::{SchemaBuilder, SchemaRegistry};
use crate::value::{ConfigValue, ValueKind};

/// Schema identifier of the built-in table.
pub const BUILTIN_SCHEMA_ID: &str = "buildconf/build-options@1";

/// Schema version of the built-in table.
pub const BUILTIN_SCHEMA_VERSION: u32 = 1;

/// Router history modes.
pub const ROUTER_MODES: &[&str] = &["hash", "history"];

fn empty_object() -> ConfigValue {
    ConfigValue::Object(Map::new())
}

pub(crate) fn builder() -> SchemaBuilder {
    use ValueKind::*;

    SchemaRegistry::builder(BUILTIN_SCHEMA_ID, BUILTIN_SCHEMA_VERSION)
        // Transpilation and output shaping
        .option(
            OptionDescriptor::new("transpile", Boolean, "Transpile JS sources for older browsers")
                .with_default(true),
        )
        .option(
            OptionDescriptor::new(
                "transpileDependencies",
                StringList,
                "Dependency patterns that are transpiled as well",
            )
            .with_default(ConfigValue::StringList(Vec::new())),
        )
        .option(
            OptionDescriptor::new("showProgress", Boolean, "Show a progress indicator while building")
                .with_default(true),
        )
        .option(
            OptionDescriptor::new("preloadChunks", Boolean, "Emit preload hints for async chunks")
                .with_default(false),
        )
        .option(
            OptionDescriptor::new("sourceMap", Boolean, "Emit source maps for production builds")
                .with_default(false),
        )
        .option(OptionDescriptor::new("minify", Boolean, "Minify the output").with_default(true))
        .option(
            OptionDescriptor::new("extractCSS", Boolean, "Extract CSS into separate files")
                .with_default(false),
        )
        .option(
            OptionDescriptor::new("gzip", Boolean, "Gzip the built assets").with_default(false),
        )
        .option(
            OptionDescriptor::new("analyze", Boolean, "Open a bundle analyzer report after building")
                .with_default(false),
        )
        .option(
            OptionDescriptor::new("modern", Boolean, "Target browsers supporting ES modules only")
                .with_default(false),
        )
        .option(OptionDescriptor::new("rtl", Boolean, "Generate right-to-left CSS").with_default(false))
        .option(
            OptionDescriptor::new("vueCompiler", Boolean, "Include the runtime template compiler")
                .with_default(false),
        )
        .option(
            OptionDescriptor::new("vueRouterMode", Enum(ROUTER_MODES), "Router history mode")
                .with_default(ConfigValue::Choice("hash".to_string())),
        )
        .option(OptionDescriptor::new("devtool", String, "Source map style used by the bundler"))
        .option(
            OptionDescriptor::new("env", Object, "Variables injected into the app at build time")
                .with_default(empty_object()),
        )
        // Pass-through options for third-party loaders and plugins
        .option(OptionDescriptor::new("terserOptions", Object, "Options for the minifier"))
        .option(OptionDescriptor::new("scssLoaderOptions", Object, "Options for the SCSS loader"))
        .option(OptionDescriptor::new("sassLoaderOptions", Object, "Options for the Sass loader"))
        .option(OptionDescriptor::new(
            "stylusLoaderOptions",
            Object,
            "Options for the Stylus loader",
        ))
        .option(OptionDescriptor::new("lessLoaderOptions", Object, "Options for the Less loader"))
        .option(OptionDescriptor::new("vueLoaderOptions", Object, "Options for the Vue loader"))
        .option(OptionDescriptor::new("gzipOptions", Object, "Options for the compression plugin"))
        .option(OptionDescriptor::new(
            "analyzerOptions",
            Object,
            "Options for the bundle analyzer plugin",
        ))
        // Lifecycle hooks
        .option(OptionDescriptor::hook(
            "beforeDev",
            LifecyclePoint::BeforeDev,
            "Runs before the dev server starts",
        ))
        .option(OptionDescriptor::hook(
            "afterDev",
            LifecyclePoint::AfterDev,
            "Runs after the dev server has started",
        ))
        .option(OptionDescriptor::hook(
            "beforeBuild",
            LifecyclePoint::BeforeBuild,
            "Runs before a production build",
        ))
        .option(OptionDescriptor::hook(
            "afterBuild",
            LifecyclePoint::AfterBuild,
            "Runs after a production build completes",
        ))
        .option(OptionDescriptor::hook(
            "onPublish",
            LifecyclePoint::OnPublish,
            "Runs when publishing the built output",
        ))
        // Configured by the pipeline depending on the build mode
        .option(
            OptionDescriptor::new("distDir", String, "Output directory")
                .with_default("dist")
                .dynamic(true),
        )
        .option(
            OptionDescriptor::new("publicPath", String, "Public path the app is served from")
                .with_default("/")
                .dynamic(true),
        )
        .option(OptionDescriptor::new("appBase", String, "Base URL of the app").dynamic(false))
        .option(
            OptionDescriptor::new("vueRouterBase", String, "Base path used by the router").dynamic(true),
        )
        .option(
            OptionDescriptor::new("htmlFilename", String, "Name of the generated HTML entry")
                .with_default("index.html")
                .dynamic(false),
        )
        .option(
            OptionDescriptor::new(
                "ssrPwaHtmlFilename",
                String,
                "Name of the offline HTML fallback in SSR + PWA builds",
            )
            .with_default("offline.html")
            .dynamic(false),
        )
        .option(OptionDescriptor::new("productName", String, "Product name shown in the app").dynamic(true))
        .option(
            OptionDescriptor::new("ignorePublicFolder", Boolean, "Skip copying the public folder")
                .with_default(false)
                .dynamic(false),
        )
        .option(
            OptionDescriptor::new("forceDevPublicPath", Boolean, "Apply publicPath in dev as well")
                .with_default(false)
                .dynamic(true),
        )
}
