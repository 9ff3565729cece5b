//! Command-line front end.
//!
//! The typical workflow is `init`, one `add` per module, `generate`, then
//! any number of `query` and `export` calls. `finalize` does the last steps
//! in one go and removes the session afterwards. `suggest` lists the
//! edge-list files to add for a source tree, and `mcp` serves the same
//! handlers as MCP tools.
//!
//! Handlers write their normal output to the given writer and report user
//! errors by returning them; the binary prints those to stderr and exits
//! with status 1.

pub mod output;

use std::collections::HashSet;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::export::{self, ExportFormat};
use crate::graph::TypeGraph;
use crate::mcp;
use crate::query::{CountFilter, QueryEngine};
use crate::session::SessionStore;
use crate::source::{load_all, EdgeListSource};
use crate::suggest;
use output::CountKind;

const DEFAULT_OUTPUT_STEM: &str = "type-dependencies";

#[derive(Debug, Parser)]
#[command(name = "typedeps")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Type dependency analyzer for compiled modules", long_about = None)]
pub struct Cli {
    /// Directory holding session state files (defaults to the system temp dir)
    #[arg(long, global = true, env = "TYPEDEP_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize a new analysis session
    Init,
    /// Add a module's edge-list file to the current session
    Add {
        /// Path to the edge-list file to add
        path: String,
    },
    /// Generate the dependency graph from the added modules
    Generate {
        /// Keep dependencies on System* and Microsoft* types
        #[arg(long)]
        include_framework: bool,
    },
    /// Export the generated dependency graph
    Export(ExportArgs),
    /// Analyze all added modules, export the graph and end the session
    Finalize {
        #[command(flatten)]
        export: ExportArgs,

        /// Keep dependencies on System* and Microsoft* types
        #[arg(long)]
        include_framework: bool,
    },
    /// Query the generated dependency graph
    #[command(subcommand)]
    Query(QueryCommand),
    /// Suggest edge-list files based on project files found in the directory tree
    Suggest {
        /// Directory to search for project files (defaults to the current directory)
        #[arg(short, long)]
        directory: Option<PathBuf>,
    },
    /// Serve the session commands as MCP tools over stdio
    Mcp,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output format (dot, json, mermaid, or html)
    #[arg(short, long, default_value = "dot")]
    pub format: ExportFormat,

    /// Output file path (defaults to type-dependencies.<ext> in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum QueryCommand {
    /// Find all types that depend on the specified type
    DependentsOf {
        /// Type name to find dependents for
        type_name: String,
    },
    /// Find all types that the specified type depends on
    DependenciesOf {
        /// Type name to find dependencies for
        type_name: String,
    },
    /// Find types with a specific dependent count
    Dependents {
        /// Count expression (e.g., 5, >5, >=5, <5, <=5, 2-10)
        #[arg(allow_hyphen_values = true)]
        count_expression: String,

        /// Show dependency counts and sort by count
        #[arg(short, long)]
        detailed: bool,
    },
    /// Find types with a specific dependency count
    Dependencies {
        /// Count expression (e.g., 5, >5, >=5, <5, <=5, 2-10)
        #[arg(allow_hyphen_values = true)]
        count_expression: String,

        /// Show dependent counts and sort by count
        #[arg(short, long)]
        detailed: bool,
    },
    /// Find all types that a type depends on (recursively)
    TransitiveDependenciesOf {
        /// Type name to find transitive dependencies for
        type_name: String,
    },
    /// Find all types that depend on a type (recursively)
    TransitiveDependentsOf {
        /// Type name to find transitive dependents for
        type_name: String,
    },
    /// Find circular dependencies in the graph
    Cycles {
        /// List every group of mutually dependent types instead of sample cycles
        #[arg(long)]
        components: bool,
    },
}

/// Runs a parsed command line, writing normal output to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let store = match &cli.state_dir {
        Some(dir) => SessionStore::new(dir),
        None => SessionStore::in_temp_dir(),
    };
    tracing::debug!(state_dir = %store.dir().display(), "using session store");

    match cli.command {
        Commands::Init => init(&store, out),
        Commands::Add { path } => add(&store, &path, out),
        Commands::Generate { include_framework } => generate(&store, include_framework, out),
        Commands::Export(args) => export_graph(&store, &args, out),
        Commands::Finalize {
            export,
            include_framework,
        } => finalize(&store, &export, include_framework, out),
        Commands::Query(query) => run_query(&store, &query, out),
        Commands::Suggest { directory } => suggest(directory, out),
        Commands::Mcp => mcp::serve_stdio(store),
    }
}

/// Rewrites a leading `--mcp` flag into the `mcp` subcommand.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().collect();
    if let Some(first) = args.get_mut(1) {
        if first.to_str().is_some_and(|arg| arg.eq_ignore_ascii_case("--mcp")) {
            *first = OsString::from("mcp");
        }
    }
    args
}

pub(crate) fn init<W: Write>(store: &SessionStore, out: &mut W) -> Result<()> {
    let session_id = store.initialize_session()?;
    writeln!(out, "Session initialized: {}", session_id)?;
    Ok(())
}

pub(crate) fn add<W: Write>(store: &SessionStore, path: &str, out: &mut W) -> Result<()> {
    if path.trim().is_empty() {
        bail!("Input path cannot be empty.");
    }
    if !Path::new(path).is_file() {
        bail!("Input file not found: {}", path);
    }

    let session_id = current_session(store)?;
    let full_path = std::fs::canonicalize(path)
        .with_context(|| format!("Error adding input: {}", path))?;
    store
        .add_input_path(&session_id, &full_path.to_string_lossy())
        .with_context(|| format!("Error adding input: {}", path))?;

    writeln!(out, "Added input: {}", full_path.display())?;
    Ok(())
}

pub(crate) fn generate<W: Write>(store: &SessionStore, include_framework: bool, out: &mut W) -> Result<()> {
    let session_id = current_session(store)?;
    let graph = analyze_inputs(store, &session_id, include_framework, out)?;

    store
        .save_generated_graph(&session_id, &graph)
        .context("Error saving dependency graph")?;
    writeln!(
        out,
        "Dependency graph generated successfully. Found {} types.",
        graph.type_count()
    )?;
    Ok(())
}

pub(crate) fn export_graph<W: Write>(store: &SessionStore, args: &ExportArgs, out: &mut W) -> Result<()> {
    let graph = load_graph(store)?;
    write_export(&graph, args, out)
}

fn finalize<W: Write>(
    store: &SessionStore,
    args: &ExportArgs,
    include_framework: bool,
    out: &mut W,
) -> Result<()> {
    let session_id = current_session(store)?;
    let graph = analyze_inputs(store, &session_id, include_framework, out)?;

    write_export(&graph, args, out)?;
    store.clear_session(&session_id)?;
    Ok(())
}

/// Loads and merges every input of the session.
fn analyze_inputs<W: Write>(
    store: &SessionStore,
    session_id: &str,
    include_framework: bool,
    out: &mut W,
) -> Result<TypeGraph> {
    let input_paths = store.input_paths(session_id)?;
    if input_paths.is_empty() {
        bail!("No inputs added to the session. Please run 'typedeps add <path>' first.");
    }

    let source = EdgeListSource {
        filter_framework: !include_framework,
    };
    let graph = load_all(&source, &input_paths, |path| {
        writeln!(out, "Analyzing: {}", path.display())
    })?;
    Ok(graph)
}

fn write_export<W: Write>(graph: &TypeGraph, args: &ExportArgs, out: &mut W) -> Result<()> {
    let output_path = match &args.output {
        Some(path) => path.clone(),
        None => std::env::current_dir()?
            .join(format!("{}.{}", DEFAULT_OUTPUT_STEM, args.format.extension())),
    };

    export::export_to_file(args.format, graph, &output_path)
        .context("Error exporting dependency graph")?;
    writeln!(out, "Dependency graph exported to: {}", output_path.display())?;
    Ok(())
}

fn current_session(store: &SessionStore) -> Result<String> {
    store
        .find_current_session()?
        .ok_or_else(|| anyhow!("No active session found. Please run 'typedeps init' first."))
}

fn load_graph(store: &SessionStore) -> Result<TypeGraph> {
    let session_id = current_session(store)?;
    store
        .generated_graph(&session_id)?
        .ok_or_else(|| anyhow!("No generated graph found. Please run 'typedeps generate' first."))
}

/// Answers a query against the current session's generated graph.
pub(crate) fn run_query<W: Write>(store: &SessionStore, query: &QueryCommand, out: &mut W) -> Result<()> {
    let graph = load_graph(store)?;
    let engine = QueryEngine::new(&graph);
    match query {
        QueryCommand::DependentsOf { type_name } => {
            require_type_name(type_name)?;
            let dependents = engine.dependents_of(type_name);
            if dependents.is_empty() {
                writeln!(out, "No types depend on '{}'.", type_name)?;
            } else {
                output::write_names(out, &dependents)?;
            }
        }
        QueryCommand::DependenciesOf { type_name } => {
            require_type_name(type_name)?;
            let dependencies = engine
                .dependencies_of(type_name)
                .ok_or_else(|| anyhow!("Type '{}' not found in the dependency graph.", type_name))?;
            if dependencies.is_empty() {
                writeln!(out, "Type '{}' has no dependencies.", type_name)?;
            } else {
                output::write_names(out, &dependencies)?;
            }
        }
        QueryCommand::Dependents {
            count_expression,
            detailed,
        } => {
            let filter = parse_count_expression(count_expression)?;
            let matches = engine.types_with_dependent_count_matching(filter);
            write_count_matches(out, &engine, &matches, *detailed, CountKind::Dependents)?;
        }
        QueryCommand::Dependencies {
            count_expression,
            detailed,
        } => {
            let filter = parse_count_expression(count_expression)?;
            let matches = engine.types_with_dependency_count_matching(filter);
            write_count_matches(out, &engine, &matches, *detailed, CountKind::Dependencies)?;
        }
        QueryCommand::TransitiveDependenciesOf { type_name } => {
            require_type_name(type_name)?;
            let reachable = engine.transitive_dependencies_of(type_name);
            if reachable.is_empty() {
                writeln!(out, "Type '{}' has no transitive dependencies.", type_name)?;
            } else {
                output::write_names(out, &reachable)?;
            }
        }
        QueryCommand::TransitiveDependentsOf { type_name } => {
            require_type_name(type_name)?;
            let reachable = engine.transitive_dependents_of(type_name);
            if reachable.is_empty() {
                writeln!(out, "No types transitively depend on '{}'.", type_name)?;
            } else {
                output::write_names(out, &reachable)?;
            }
        }
        QueryCommand::Cycles { components } => {
            let groups = if *components {
                engine.cyclic_components()
            } else {
                engine.circular_dependencies()
            };
            if groups.is_empty() {
                writeln!(out, "No circular dependencies found.")?;
            } else if *components {
                output::write_components(out, &groups)?;
            } else {
                output::write_cycles(out, &groups)?;
            }
        }
    }
    Ok(())
}

fn suggest<W: Write>(directory: Option<PathBuf>, out: &mut W) -> Result<()> {
    let directory = match directory {
        Some(directory) if !directory.as_os_str().is_empty() => directory,
        _ => std::env::current_dir()?,
    };

    let suggestions = suggest::suggest_inputs(&directory)?;
    if suggestions.is_empty() {
        writeln!(
            out,
            "No edge-list files found matching project files in the specified directory."
        )?;
    }
    for suggestion in &suggestions {
        writeln!(out, "{} -> {}", suggestion.project_name, suggestion.input_path.display())?;
    }
    Ok(())
}

fn write_count_matches<W: Write>(
    out: &mut W,
    engine: &QueryEngine<'_>,
    matches: &HashSet<String>,
    detailed: bool,
    kind: CountKind,
) -> Result<()> {
    if matches.is_empty() {
        writeln!(out, "No types match the specified criteria.")?;
    } else if detailed {
        output::write_detailed(out, engine, matches, kind)?;
    } else {
        output::write_names(out, matches)?;
    }
    Ok(())
}

fn require_type_name(type_name: &str) -> Result<()> {
    if type_name.trim().is_empty() {
        bail!("Type name cannot be empty.");
    }
    Ok(())
}

fn parse_count_expression(expression: &str) -> Result<CountFilter> {
    if expression.trim().is_empty() {
        bail!("Count expression cannot be empty.");
    }
    Ok(expression.parse::<CountFilter>()?)
}
