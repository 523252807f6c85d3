//! Schema documentation rendering for `buildconf options`.

use buildconf_hooks::LifecyclePoint;
use buildconf_schema::{Mutability, OptionDescriptor, SchemaRegistry, ValueKind};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

/// Documentation entry for one option.
#[derive(Debug, Clone, Serialize)]
pub struct OptionDoc {
    pub name: &'static str,
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub mutability: Mutability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook: Option<LifecyclePoint>,
    pub description: &'static str,
}

impl From<&OptionDescriptor> for OptionDoc {
    fn from(desc: &OptionDescriptor) -> Self {
        Self {
            name: desc.name(),
            kind: desc.kind(),
            default: desc.default_value().and_then(|v| v.to_json()),
            mutability: desc.mutability(),
            hook: desc.lifecycle_point(),
            description: desc.description(),
        }
    }
}

/// Options in declaration order.
pub fn option_docs(registry: &SchemaRegistry) -> Vec<OptionDoc> {
    registry.all_options().iter().map(OptionDoc::from).collect()
}

fn mutability_label(mutability: Mutability) -> &'static str {
    match mutability {
        Mutability::Static => "static",
        Mutability::Dynamic { overridable: true } => "dynamic (overridable)",
        Mutability::Dynamic { overridable: false } => "dynamic",
    }
}

fn default_label(doc: &OptionDoc) -> String {
    doc.default
        .as_ref()
        .map(Value::to_string)
        .unwrap_or_else(|| "-".to_string())
}

/// Plain text listing, one option per line.
pub fn render_text(registry: &SchemaRegistry) -> String {
    let docs = option_docs(registry);
    let width = docs.iter().map(|d| d.name.len()).max().unwrap_or(0);

    let mut out = format!("{} (version {})\n\n", registry.schema_id(), registry.version());
    for doc in &docs {
        let _ = writeln!(
            out,
            "  {:width$}  {:<22} {:<22} default: {}",
            doc.name,
            doc.kind.to_string(),
            mutability_label(doc.mutability),
            default_label(doc),
            width = width,
        );
        let _ = writeln!(out, "  {:width$}  {}", "", doc.description, width = width);
    }
    out
}

/// Markdown table.
pub fn render_markdown(registry: &SchemaRegistry) -> String {
    let mut out = format!(
        "# Build options\n\nSchema `{}`, version {}.\n\n",
        registry.schema_id(),
        registry.version()
    );
    out.push_str("| Option | Kind | Default | Class | Description |\n");
    out.push_str("|--------|------|---------|-------|-------------|\n");

    for doc in option_docs(registry) {
        let description = match doc.hook {
            Some(point) => format!("{} (awaited at `{}`)", doc.description, point),
            None => doc.description.to_string(),
        };
        let _ = writeln!(
            out,
            "| `{}` | {} | `{}` | {} | {} |",
            doc.name,
            doc.kind.to_string().replace('|', "\\|"),
            default_label(&doc),
            mutability_label(doc.mutability),
            description,
        );
    }
    out
}
