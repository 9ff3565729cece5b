//! Mermaid flowchart export implementation.
//!
//! The diagram is wrapped in a ```` ```mermaid ```` fence so the file can be
//! pasted straight into Markdown.

use super::Exporter;
use crate::graph::TypeGraph;
use std::io::{self, Write};

/// Characters that may not appear in a Mermaid node id.
const INVALID_ID_CHARS: &[char] = &[
    ' ', '-', '.', '+', '[', ']', '<', '>', '(', ')', '{', '}', ',', ':', ';', '/', '\\', '&', '*',
    '%', '$', '#', '@', '!', '?', '=', '|', '~', '`', '^',
];

const FALLBACK_ID: &str = "Type";

/// Mermaid exporter implementation.
pub struct MermaidExporter;

impl Exporter for MermaidExporter {
    fn export<W: Write>(&self, graph: &TypeGraph, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "```mermaid")?;
        writeln!(writer, "graph TD")?;

        for (type_name, dependencies) in graph.to_snapshot() {
            let type_label = escape_label(&type_name);
            let type_id = node_id(&type_label);

            for dependency in &dependencies {
                let dependency_label = escape_label(dependency);
                writeln!(
                    writer,
                    "    {}[\"{}\"] --> {}[\"{}\"]",
                    type_id,
                    type_label,
                    node_id(&dependency_label),
                    dependency_label
                )?;
            }
        }

        writeln!(writer, "```")
    }
}

/// Escapes a type name for a quoted Mermaid label.
fn escape_label(input: &str) -> String {
    input
        .replace('"', "&quot;")
        .replace('\n', " ")
        .replace('\r', " ")
}

/// Derives a Mermaid node id from a label.
///
/// Ids hold only letters, digits and single underscores. They never end
/// with an underscore and only start with one to guard a leading digit.
fn node_id(label: &str) -> String {
    let mut collapsed = String::with_capacity(label.len());
    for c in label.chars() {
        let c = if INVALID_ID_CHARS.contains(&c) { '_' } else { c };
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }

    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_ID.to_string()
    } else if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(graph: &TypeGraph) -> String {
        let mut output = Vec::new();
        MermaidExporter.export(graph, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_mermaid_export_basic() {
        let mut graph = TypeGraph::new();
        graph.add_dependency("App.Service", "App.Repository");

        assert_eq!(
            render(&graph),
            "```mermaid\ngraph TD\n    App_Service[\"App.Service\"] --> App_Repository[\"App.Repository\"]\n```\n"
        );
    }

    #[test]
    fn test_mermaid_escapes_labels() {
        let mut graph = TypeGraph::new();
        graph.add_dependency("Say\"Hi\"", "Line\nBreak");

        let output = render(&graph);
        assert!(output.contains("[\"Say&quot;Hi&quot;\"]"));
        assert!(output.contains("Line_Break[\"Line Break\"]"));
    }

    #[test]
    fn test_node_id_generic_and_nested_names() {
        assert_eq!(node_id("List<App.Item>"), "List_App_Item");
        assert_eq!(node_id("App.Outer+Inner[]"), "App_Outer_Inner");
        assert_eq!(node_id("<>c__DisplayClass0_0"), "c_DisplayClass0_0");
    }

    #[test]
    fn test_node_id_leading_digit() {
        assert_eq!(node_id("1Type"), "_1Type");
        assert_eq!(node_id(".9.Lives"), "_9_Lives");
    }

    #[test]
    fn test_node_id_fallback() {
        assert_eq!(node_id("<>"), "Type");
        assert_eq!(node_id("..."), "Type");
    }
}
