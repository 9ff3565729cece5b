//! Graphviz DOT export implementation.

use super::Exporter;
use crate::graph::TypeGraph;
use std::io::{self, Write};

/// DOT exporter implementation.
pub struct DotExporter;

impl Exporter for DotExporter {
    fn export<W: Write>(&self, graph: &TypeGraph, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "digraph TypeDependencies {{")?;

        for (type_name, dependencies) in graph.to_snapshot() {
            let type_name = escape_dot(&type_name);
            for dependency in &dependencies {
                writeln!(writer, "  \"{}\" -> \"{}\";", type_name, escape_dot(dependency))?;
            }
        }

        writeln!(writer, "}}")
    }
}

/// Escapes a string for use inside a double-quoted DOT identifier.
fn escape_dot(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
