//! Export functionality for type dependency graphs.
//!
//! This module provides exporters for rendering a graph in various
//! formats: Graphviz DOT, JSON, Mermaid, and a self-contained HTML viewer.
//!
//! Every exporter walks the graph's sorted snapshot, so the same graph
//! always renders to the same bytes.

pub mod dot;
pub mod html;
pub mod json;
pub mod mermaid;

use crate::graph::TypeGraph;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Graphviz DOT - render with `dot -Tsvg`
    #[default]
    Dot,
    /// JSON format - machine-readable, reloadable as an edge list
    Json,
    /// Mermaid flowchart wrapped in a Markdown fence
    Mermaid,
    /// Interactive HTML page
    Html,
}

impl ExportFormat {
    /// File extension used when no output path is given.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Dot => "dot",
            ExportFormat::Json => "json",
            ExportFormat::Mermaid => "mmd",
            ExportFormat::Html => "html",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" => Ok(ExportFormat::Dot),
            "json" => Ok(ExportFormat::Json),
            "mermaid" | "mmd" => Ok(ExportFormat::Mermaid),
            "html" => Ok(ExportFormat::Html),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: dot, json, mermaid, html",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Dot => write!(f, "dot"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Mermaid => write!(f, "mermaid"),
            ExportFormat::Html => write!(f, "html"),
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the graph to the given writer.
    fn export<W: Write>(&self, graph: &TypeGraph, writer: &mut W) -> io::Result<()>;
}

/// Export a graph in the specified format.
pub fn export<W: Write>(format: ExportFormat, graph: &TypeGraph, writer: &mut W) -> io::Result<()> {
    match format {
        ExportFormat::Dot => dot::DotExporter.export(graph, writer),
        ExportFormat::Json => json::JsonExporter.export(graph, writer),
        ExportFormat::Mermaid => mermaid::MermaidExporter.export(graph, writer),
        ExportFormat::Html => html::HtmlExporter::default().export(graph, writer),
    }
}

/// Export a graph to a string.
pub fn export_to_string(format: ExportFormat, graph: &TypeGraph) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, graph, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Export a graph to a file, replacing any existing content.
pub fn export_to_file(format: ExportFormat, graph: &TypeGraph, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    export(format, graph, &mut writer)?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), %format, "exported graph");
    Ok(())
}
