//! MCP server mode.
//!
//! `typedeps mcp` (or `typedeps --mcp`) serves the session workflow as
//! Model Context Protocol tools over stdio, so an agent can build and query
//! a graph without shelling out. Each tool runs the same handler as the
//! matching CLI command and returns its output as text.
//!
//! ## Tools
//!
//! - `td_init`, `td_add`, `td_generate`, `td_export` - session workflow
//! - `td_query_dependents_of`, `td_query_dependencies_of` - direct neighbours
//! - `td_query_dependents`, `td_query_dependencies` - count expressions
//! - `td_query_transitive_dependencies_of`, `td_query_transitive_dependents_of`
//! - `td_query_circular_dependencies`
//! - `td_help` - workflow and tool reference
//!
//! Stdout carries the protocol; logs go to stderr.

mod server;

use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};

use crate::session::SessionStore;

pub use server::TypeDepsServer;

/// Runs the MCP server on stdin/stdout until the client disconnects.
pub fn serve_stdio(store: SessionStore) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        tracing::info!(state_dir = %store.dir().display(), "starting MCP server");
        let service = TypeDepsServer::new(store).serve(stdio()).await?;
        let reason = service.waiting().await?;
        tracing::info!(?reason, "MCP server stopped");
        Ok::<_, anyhow::Error>(())
    })
}

pub(crate) const HELP_TEXT: &str = "\
typedeps - analyze and query type dependencies across compiled modules

WORKFLOW:
  1. td_init()                   - Initialize a new analysis session
  2. td_add(inputPath)           - Add edge-list files to analyze
  3. td_generate()               - Generate the dependency graph
  4. td_export(format?, output?) - Export the graph (optional)
  5. td_query_*()                - Query the generated graph

SESSION MANAGEMENT:
  td_init()
    Initialize a new analysis session. Each call creates a fresh session
    and makes it the current one.

INPUTS:
  td_add(inputPath: string)
    Add a module's edge-list file to the current session. The path is
    stored in absolute form; adding the same file twice has no effect.

GRAPH GENERATION:
  td_generate(includeFramework?: bool)
    Load every added file and merge them into one graph. Dependencies on
    System* and Microsoft* types are dropped unless includeFramework is true.
    Must be called after adding inputs and before querying or exporting.

EXPORT:
  td_export(format?: string, outputPath?: string)
    Write the generated graph to a file.
      - format: dot, json, mermaid or html (defaults to dot)
      - outputPath: defaults to type-dependencies.<ext> in the current directory

QUERY TOOLS:
  td_query_dependents_of(typeName: string)
    Types that directly depend on the type.

  td_query_dependencies_of(typeName: string)
    Types the type directly depends on.

  td_query_dependents(countExpression: string, detailed?: bool)
    Types whose number of dependents matches the expression. With detailed,
    each line also shows the dependency count, sorted by dependent count,
    then dependency count, then name.

  td_query_dependencies(countExpression: string, detailed?: bool)
    Types whose number of dependencies matches the expression. With
    detailed, each line also shows the dependent count.

  td_query_transitive_dependencies_of(typeName: string)
    Every type reachable by following dependencies.

  td_query_transitive_dependents_of(typeName: string)
    Every type that reaches the type by following dependencies.

  td_query_circular_dependencies(components?: bool)
    Dependency cycles, one per line as \"A -> B -> A\". With components,
    every group of mutually dependent types instead.

COUNT EXPRESSIONS:
  5      exactly 5
  >5     more than 5
  >=5    at least 5
  <5     fewer than 5
  <=5    at most 5
  2-10   between 2 and 10 inclusive

NOTES:
  - Results are sorted by name; compiler-generated types (<...>) are hidden.
  - Errors are returned as text starting with \"Error:\".
";
