//! buildconf CLI
//!
//! Entry point for the `buildconf` command-line tool.

use buildconf::config::{
    default_host_path, load_layers, parse_overrides, LayeredSource, ResolutionReport,
};
use buildconf::docs::{option_docs, render_markdown, render_text};
use buildconf::{resolve, BuildMode, DynamicContext, DynamicPolicy, SchemaRegistry, Validator};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;

/// Exit code for configurations with field errors
const EXIT_INVALID: i32 = 1;

/// Exit code for files that cannot be loaded
const EXIT_LOAD_ERROR: i32 = 2;

/// Project config used when no -c is given
const DEFAULT_PROJECT_CONFIG: &str = "buildconf.toml";

#[derive(Parser)]
#[command(name = "buildconf")]
#[command(about = "Validate and resolve build configuration", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Project config files, merged in order (default: buildconf.toml)
    #[arg(long, short = 'c')]
    config: Vec<PathBuf>,

    /// Host config file (default: ~/.config/buildconf/build.toml)
    #[arg(long)]
    host_config: Option<PathBuf>,

    /// Ignore the host config file
    #[arg(long)]
    no_host_config: bool,

    /// Override an option: key=value, value parsed as JSON when possible
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Reject user values for pipeline-computed options
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration files and report every field error
    Check {
        #[command(flatten)]
        sources: SourceArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Resolve the configuration for a build mode
    Resolve {
        #[command(flatten)]
        sources: SourceArgs,

        /// Build mode
        #[arg(long, short = 'm', default_value = "spa")]
        mode: BuildMode,

        /// Resolve for a dev session instead of a production build
        #[arg(long)]
        dev: bool,
    },

    /// Document the recognized options
    Options {
        #[arg(long, value_enum, default_value_t = DocFormat::Text)]
        format: DocFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DocFormat {
    Text,
    Markdown,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { sources, json } => run_check(&sources, json),
        Commands::Resolve { sources, mode, dev } => run_resolve(&sources, mode, dev),
        Commands::Options { format } => run_options(format),
    }
}

fn policy(sources: &SourceArgs) -> DynamicPolicy {
    if sources.strict {
        DynamicPolicy::Strict
    } else {
        DynamicPolicy::Permissive
    }
}

fn load_sources(sources: &SourceArgs) -> LayeredSource {
    let host = if sources.no_host_config {
        None
    } else {
        sources.host_config.clone().or_else(default_host_path)
    };

    let project = if sources.config.is_empty() {
        let default = PathBuf::from(DEFAULT_PROJECT_CONFIG);
        if default.exists() {
            vec![default]
        } else {
            Vec::new()
        }
    } else {
        sources.config.clone()
    };

    let loaded = parse_overrides(&sources.overrides)
        .and_then(|cli| load_layers(host.as_deref(), &project, Some(cli)));

    match loaded {
        Ok(layered) => layered,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(EXIT_LOAD_ERROR);
        }
    }
}

fn run_check(sources: &SourceArgs, json: bool) {
    let layered = load_sources(sources);
    let registry = SchemaRegistry::builtin();

    let result = Validator::new(registry)
        .with_policy(policy(sources))
        .validate(&layered.raw);

    if json {
        let output = serde_json::json!({
            "valid": result.is_valid(),
            "sources": layered.sources,
            "errors": result.errors(),
        });
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(EXIT_INVALID);
            }
        }
    } else if result.is_valid() {
        println!("Configuration valid ({} sources)", layered.sources.len());
        for source in &layered.sources {
            if let Some(ref path) = source.path {
                println!("  {}", path);
            }
        }
    } else {
        eprintln!("Configuration invalid:");
        for error in result.errors() {
            eprintln!("  {}", error);
        }
    }

    if !result.is_valid() {
        process::exit(EXIT_INVALID);
    }
}

fn run_resolve(sources: &SourceArgs, mode: BuildMode, dev: bool) {
    let layered = load_sources(sources);
    let registry = SchemaRegistry::builtin();
    let context = DynamicContext::new(mode, dev);

    let resolved = match resolve(registry, &layered.raw, context, policy(sources)) {
        Ok(resolved) => resolved,
        Err(errors) => {
            eprintln!("Configuration invalid:\n{}", errors);
            process::exit(EXIT_INVALID);
        }
    };

    let output = ResolutionReport::new(registry, &resolved, context, layered.sources)
        .map_err(|e| e.to_string())
        .and_then(|report| report.to_json().map_err(|e| e.to_string()));

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(EXIT_INVALID);
        }
    }
}

fn run_options(format: DocFormat) {
    let registry = SchemaRegistry::builtin();

    match format {
        DocFormat::Text => print!("{}", render_text(registry)),
        DocFormat::Markdown => print!("{}", render_markdown(registry)),
        DocFormat::Json => {
            let output = serde_json::json!({
                "schema_id": registry.schema_id(),
                "version": registry.version(),
                "options": option_docs(registry),
            });
            match serde_json::to_string_pretty(&output) {
                Ok(s) => println!("{}", s),
                Err(e) => {
                    eprintln!("Error serializing output: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
