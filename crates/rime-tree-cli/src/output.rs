//! Output formatting
//!
//! Tree rendering with box-drawing connectors and value serialization

use colored::*;
use rime_tree_core::{ConfigNode, FileKind, NodeKind, Result, RimeTreeError};

use crate::ValueFormat;

/// Renders a node and its descendants as an indented tree
pub struct TreeRenderer {
    max_depth: Option<usize>,
}

impl TreeRenderer {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self { max_depth }
    }

    pub fn render(&self, node: &ConfigNode) -> String {
        let mut out = String::new();
        out.push_str(&styled_label(node));
        out.push('\n');
        self.render_children(node, "", 1, &mut out);
        out
    }

    fn render_children(&self, node: &ConfigNode, prefix: &str, depth: usize, out: &mut String) {
        if self.max_depth.is_some_and(|max| depth > max) {
            if !node.children().is_empty() {
                out.push_str(&format!("{prefix}└── {}\n", "…".dimmed()));
            }
            return;
        }

        let count = node.children().len();
        for (index, child) in node.children().values().enumerate() {
            let last = index + 1 == count;
            let connector = if last { "└── " } else { "├── " };
            out.push_str(prefix);
            out.push_str(connector);
            out.push_str(&styled_label(child));
            out.push('\n');

            let nested = format!("{prefix}{}", if last { "    " } else { "│   " });
            self.render_children(child, &nested, depth + 1, out);
        }
    }
}

/// [`ConfigNode::label`] with colors by node kind
pub fn styled_label(node: &ConfigNode) -> String {
    match node.kind() {
        NodeKind::Root => "<root>".bold().to_string(),
        NodeKind::Folder => node.key().bold().to_string(),
        NodeKind::File => match node.file_kind() {
            Some(FileKind::Custom) => node.key().magenta().bold().to_string(),
            _ => node.key().blue().bold().to_string(),
        },
        NodeKind::PatchContainer => node.key().magenta().to_string(),
        NodeKind::Node => match node.value() {
            Some(value) if node.is_sequence_element() => {
                format!("{} {}", "-".yellow(), value.to_string().green())
            }
            Some(value) => format!("{}: {}", node.key(), value.to_string().green()),
            None => node.key().cyan().to_string(),
        },
    }
}

/// Short name of a document's kind
pub fn file_kind_name(kind: Option<FileKind>) -> &'static str {
    match kind {
        Some(FileKind::Custom) => "custom",
        Some(FileKind::Default) | None => "default",
    }
}

/// Serialize a subtree as YAML or pretty JSON
pub fn format_value(node: &ConfigNode, format: ValueFormat) -> Result<String> {
    let value = node.to_value();
    match format {
        ValueFormat::Yaml => serde_yaml::to_string(&value).map_err(|e| {
            RimeTreeError::internal_error(format!("Failed to serialize YAML: {e}"))
        }),
        ValueFormat::Json => serde_json::to_string_pretty(&value).map_err(|e| {
            RimeTreeError::internal_error(format!("Failed to serialize JSON: {e}"))
        }),
    }
}
