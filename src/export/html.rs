//! HTML export implementation.
//!
//! Fills an embedded page template with the graph as node and reference
//! lists. The page draws the graph client-side and needs no network access.

use super::Exporter;
use crate::graph::TypeGraph;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::{self, Write};

const TEMPLATE: &str = include_str!("../../assets/graph.html");
const SOURCE_TOKEN: &str = "{#SOURCE_TOKEN#}";
const TITLE_TOKEN: &str = "{#TITLE_TOKEN#}";
const DEFAULT_TITLE: &str = "Type Dependencies";

/// HTML exporter implementation.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    /// Page title, escaped before it is inserted.
    pub title: String,
}

impl Default for HtmlExporter {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Data consumed by the page script.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TemplateData {
    projects: Vec<TemplateNode>,
    packages: Vec<TemplateNode>,
    references: Vec<TemplateReference>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TemplateNode {
    id: String,
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TemplateReference {
    from: String,
    to: String,
}

impl TemplateData {
    /// Lists every type once, sorted, and one reference per edge.
    fn from_graph(graph: &TypeGraph) -> Self {
        let snapshot = graph.to_snapshot();

        let mut names = BTreeSet::new();
        let mut references = Vec::new();
        for (type_name, dependencies) in &snapshot {
            names.insert(type_name.as_str());
            for dependency in dependencies {
                names.insert(dependency.as_str());
                references.push(TemplateReference {
                    from: type_name.clone(),
                    to: dependency.clone(),
                });
            }
        }

        let projects = names
            .into_iter()
            .map(|name| TemplateNode {
                id: name.to_string(),
                name: name.to_string(),
            })
            .collect();

        Self {
            projects,
            packages: Vec::new(),
            references,
        }
    }
}

impl Exporter for HtmlExporter {
    fn export<W: Write>(&self, graph: &TypeGraph, writer: &mut W) -> io::Result<()> {
        let data = TemplateData::from_graph(graph);
        let json = serde_json::to_string_pretty(&data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let page = TEMPLATE
            .replace(SOURCE_TOKEN, &escape_script(&json))
            .replace(TITLE_TOKEN, &escape_html(&self.title));

        writer.write_all(page.as_bytes())
    }
}

/// Escapes JSON for embedding in a `<script>` element.
///
/// The replacements are JSON string escapes, so the payload parses to the
/// same value while never containing `</script>` or `<!--`.
fn escape_script(json: &str) -> String {
    json.replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
