//! JSON export implementation.
//!
//! Writes the graph as an object mapping each type to its sorted
//! dependency list. The output can be read back by the edge-list source.

use super::Exporter;
use crate::graph::TypeGraph;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, graph: &TypeGraph, writer: &mut W) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&graph.to_snapshot())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
