//! Configuration file loading
//!
//! Raw configuration comes from up to three layers, merged in order before
//! validation:
//! 1. Host/user config (~/.config/buildconf/build.toml), optional
//! 2. Project config files (buildconf.toml or explicit paths)
//! 3. CLI `--set` overrides

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::merge::merge_layers;
use super::raw::RawConfig;

/// Origin of a configuration source
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    Host,
    Project,
    Cli,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SourceInfo {
    pub origin: SourceOrigin,

    /// File path (None for CLI overrides)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for CLI overrides)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// One parsed configuration file.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub document: Map<String, Value>,
    pub info: SourceInfo,
}

/// All layers merged into one raw configuration.
#[derive(Debug, Clone)]
pub struct LayeredSource {
    pub raw: RawConfig,

    /// Contributing sources in precedence order
    pub sources: Vec<SourceInfo>,
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(Self::Toml),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Loader errors
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("unsupported config format for {0}: expected .toml or .json")]
    UnsupportedFormat(String),

    #[error("{0}: top level must be a table")]
    NotATable(String),

    #[error("invalid override '{0}': expected key=value")]
    InvalidOverride(String),
}

/// Default host config path, if a home directory is known
pub fn default_host_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(".config").join("buildconf").join("build.toml"))
}

/// Load and parse one file, returning the document and its provenance
pub fn load_file(path: &Path, origin: SourceOrigin) -> Result<LoadedSource, LoadError> {
    let label = path.display().to_string();
    let format = Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(label.clone()))?;

    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: label.clone(),
        source,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes).map_err(|e| LoadError::Parse {
        path: label.clone(),
        message: format!("invalid UTF-8: {}", e),
    })?;

    let document = parse_str(&contents, format, &label)?;
    tracing::debug!(path = %label, ?origin, keys = document.len(), "loaded config file");

    Ok(LoadedSource {
        document,
        info: SourceInfo {
            origin,
            path: Some(label),
            digest: Some(digest),
        },
    })
}

/// Parse a document, requiring a table at the top level
pub fn parse_str(contents: &str, format: Format, label: &str) -> Result<Map<String, Value>, LoadError> {
    let value = match format {
        Format::Toml => {
            let table: toml::Value = toml::from_str(contents).map_err(|e| LoadError::Parse {
                path: label.to_string(),
                message: e.to_string(),
            })?;
            toml_to_json(table)
        }
        Format::Json => serde_json::from_str(contents).map_err(|e| LoadError::Parse {
            path: label.to_string(),
            message: e.to_string(),
        })?,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(LoadError::NotATable(label.to_string())),
    }
}

/// Parse `key=value` CLI overrides. Values are JSON, falling back to a
/// plain string when they do not parse.
pub fn parse_overrides(pairs: &[String]) -> Result<Map<String, Value>, LoadError> {
    let mut map = Map::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .filter(|(k, _)| !k.is_empty())
            .ok_or_else(|| LoadError::InvalidOverride(pair.clone()))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        map.insert(key.to_string(), value);
    }
    Ok(map)
}

/// Load host and project files plus CLI overrides into one raw config.
///
/// A missing host file is skipped; missing project files are errors.
pub fn load_layers(
    host: Option<&Path>,
    project: &[PathBuf],
    cli: Option<Map<String, Value>>,
) -> Result<LayeredSource, LoadError> {
    let mut layers = Vec::new();
    let mut sources = Vec::new();

    if let Some(path) = host {
        if path.exists() {
            let loaded = load_file(path, SourceOrigin::Host)?;
            layers.push(Value::Object(loaded.document));
            sources.push(loaded.info);
        } else {
            tracing::debug!(path = %path.display(), "no host config");
        }
    }

    for path in project {
        let loaded = load_file(path, SourceOrigin::Project)?;
        layers.push(Value::Object(loaded.document));
        sources.push(loaded.info);
    }

    if let Some(overrides) = cli.filter(|m| !m.is_empty()) {
        layers.push(Value::Object(overrides));
        sources.push(SourceInfo {
            origin: SourceOrigin::Cli,
            path: None,
            digest: None,
        });
    }

    let raw = match merge_layers(layers) {
        Value::Object(map) => RawConfig::from_map(map),
        _ => RawConfig::new(),
    };

    Ok(LayeredSource { raw, sources })
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
