use std::path::PathBuf;

use anyhow::anyhow;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::HELP_TEXT;
use crate::cli::{self, ExportArgs, QueryCommand};
use crate::export::ExportFormat;
use crate::session::SessionStore;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    /// Path to the edge-list file to add
    #[schemars(description = "Path to the edge-list file to add")]
    pub input_path: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Keep dependencies on System* and Microsoft* types
    #[serde(default)]
    pub include_framework: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    /// Output format
    #[schemars(description = "Output format (dot, json, mermaid, or html). Defaults to dot.")]
    pub format: Option<String>,

    /// Output file path
    #[schemars(
        description = "Output file path. Defaults to type-dependencies.<ext> in the current directory."
    )]
    pub output_path: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeNameRequest {
    /// Fully qualified type name
    #[schemars(description = "Fully qualified type name")]
    pub type_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountRequest {
    /// Count expression
    #[schemars(description = "Count expression (e.g., 5, >5, >=5, <5, <=5, 2-10)")]
    pub count_expression: String,

    /// Show the other count and sort by counts
    #[serde(default)]
    #[schemars(description = "Show detailed output with additional count information")]
    pub detailed: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CyclesRequest {
    /// List groups of mutually dependent types instead of cycles
    #[serde(default)]
    pub components: bool,
}

/// MCP tool surface over a [`SessionStore`].
#[derive(Clone)]
pub struct TypeDepsServer {
    store: SessionStore,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl TypeDepsServer {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(name = "td_init", description = "Initialize a new analysis session")]
    async fn td_init(&self) -> Result<CallToolResult, McpError> {
        Ok(self.respond(|store, out| cli::init(store, out)))
    }

    #[tool(name = "td_add", description = "Add an edge-list file to the current analysis session")]
    async fn td_add(
        &self,
        Parameters(request): Parameters<AddRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.respond(|store, out| cli::add(store, &request.input_path, out)))
    }

    #[tool(name = "td_generate", description = "Generate the dependency graph from the added inputs")]
    async fn td_generate(
        &self,
        Parameters(request): Parameters<GenerateRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.respond(|store, out| cli::generate(store, request.include_framework, out)))
    }

    #[tool(name = "td_export", description = "Export the generated dependency graph")]
    async fn td_export(
        &self,
        Parameters(request): Parameters<ExportRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.respond(|store, out| {
            let format = match request.format.as_deref() {
                Some(format) if !format.trim().is_empty() => {
                    format.parse::<ExportFormat>().map_err(|err| anyhow!(err))?
                }
                _ => ExportFormat::default(),
            };
            let args = ExportArgs {
                format,
                output: request
                    .output_path
                    .filter(|path| !path.trim().is_empty())
                    .map(PathBuf::from),
            };
            cli::export_graph(store, &args, out)
        }))
    }

    #[tool(
        name = "td_query_dependents_of",
        description = "Find all types that depend on the specified type"
    )]
    async fn td_query_dependents_of(
        &self,
        Parameters(request): Parameters<TypeNameRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.query(QueryCommand::DependentsOf {
            type_name: request.type_name,
        }))
    }

    #[tool(
        name = "td_query_dependencies_of",
        description = "Find all types that the specified type depends on"
    )]
    async fn td_query_dependencies_of(
        &self,
        Parameters(request): Parameters<TypeNameRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.query(QueryCommand::DependenciesOf {
            type_name: request.type_name,
        }))
    }

    #[tool(
        name = "td_query_dependents",
        description = "Find types with a specific dependent count. Supports: number, >number, >=number, <number, <=number, or min-max"
    )]
    async fn td_query_dependents(
        &self,
        Parameters(request): Parameters<CountRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.query(QueryCommand::Dependents {
            count_expression: request.count_expression,
            detailed: request.detailed,
        }))
    }

    #[tool(
        name = "td_query_dependencies",
        description = "Find types with a specific dependency count. Supports: number, >number, >=number, <number, <=number, or min-max"
    )]
    async fn td_query_dependencies(
        &self,
        Parameters(request): Parameters<CountRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.query(QueryCommand::Dependencies {
            count_expression: request.count_expression,
            detailed: request.detailed,
        }))
    }

    #[tool(
        name = "td_query_transitive_dependencies_of",
        description = "Find all types that a type depends on (recursively)"
    )]
    async fn td_query_transitive_dependencies_of(
        &self,
        Parameters(request): Parameters<TypeNameRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.query(QueryCommand::TransitiveDependenciesOf {
            type_name: request.type_name,
        }))
    }

    #[tool(
        name = "td_query_transitive_dependents_of",
        description = "Find all types that depend on a type (recursively)"
    )]
    async fn td_query_transitive_dependents_of(
        &self,
        Parameters(request): Parameters<TypeNameRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.query(QueryCommand::TransitiveDependentsOf {
            type_name: request.type_name,
        }))
    }

    #[tool(
        name = "td_query_circular_dependencies",
        description = "Find all circular dependency cycles in the graph"
    )]
    async fn td_query_circular_dependencies(
        &self,
        Parameters(request): Parameters<CyclesRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.query(QueryCommand::Cycles {
            components: request.components,
        }))
    }

    #[tool(name = "td_help", description = "Get help information about the typedeps tools")]
    async fn td_help(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(HELP_TEXT)]))
    }
}

impl TypeDepsServer {
    fn query(&self, command: QueryCommand) -> CallToolResult {
        self.respond(|store, out| cli::run_query(store, &command, out))
    }

    /// Runs a CLI handler and turns its output, or its error, into a tool result.
    fn respond<F>(&self, handler: F) -> CallToolResult
    where
        F: FnOnce(&SessionStore, &mut Vec<u8>) -> anyhow::Result<()>,
    {
        let mut out = Vec::new();
        match handler(&self.store, &mut out) {
            Ok(()) => {
                let text = String::from_utf8_lossy(&out);
                CallToolResult::success(vec![Content::text(text.trim_end())])
            }
            Err(err) => {
                tracing::debug!(error = ?err, "tool call failed");
                CallToolResult::error(vec![Content::text(format!("Error: {:#}", err))])
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for TypeDepsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Type dependency analysis. Call td_init, td_add and td_generate, then the \
                 td_query_* tools. td_help describes every tool."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn server() -> (tempfile::TempDir, TypeDepsServer) {
        let dir = tempfile::tempdir().unwrap();
        let server = TypeDepsServer::new(SessionStore::new(dir.path().join("state")));
        (dir, server)
    }

    async fn generated_server() -> (tempfile::TempDir, TypeDepsServer) {
        let (dir, server) = server();
        let input = dir.path().join("app.edges.json");
        fs::write(
            &input,
            r#"{
                "App.Service": ["App.Repository", "System.String"],
                "App.Repository": ["App.Entity"],
                "App.Entity": ["App.Repository"]
            }"#,
        )
        .unwrap();

        server.td_init().await.unwrap();
        let added = server
            .td_add(Parameters(AddRequest {
                input_path: input.to_string_lossy().into_owned(),
            }))
            .await
            .unwrap();
        assert_ne!(added.is_error, Some(true), "{}", text(&added));
        let generated = server
            .td_generate(Parameters(GenerateRequest::default()))
            .await
            .unwrap();
        assert!(text(&generated).ends_with("Found 3 types."));
        (dir, server)
    }

    #[test]
    fn test_server_lists_all_tools() {
        let (_dir, server) = server();
        let names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();

        for expected in [
            "td_init",
            "td_add",
            "td_generate",
            "td_export",
            "td_query_dependents_of",
            "td_query_dependencies_of",
            "td_query_dependents",
            "td_query_dependencies",
            "td_query_transitive_dependencies_of",
            "td_query_transitive_dependents_of",
            "td_query_circular_dependencies",
            "td_help",
        ] {
            assert!(names.iter().any(|name| name == expected), "missing {}", expected);
        }
    }

    #[tokio::test]
    async fn test_tools_report_missing_session() {
        let (_dir, server) = server();
        let result = server
            .td_query_dependents_of(Parameters(TypeNameRequest {
                type_name: "App.Entity".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            text(&result),
            "Error: No active session found. Please run 'typedeps init' first."
        );
    }

    #[tokio::test]
    async fn test_query_tools_share_cli_output() {
        let (_dir, server) = generated_server().await;

        let dependents = server
            .td_query_dependents_of(Parameters(TypeNameRequest {
                type_name: "App.Repository".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(text(&dependents), "App.Entity\nApp.Service");

        let counts = server
            .td_query_dependencies(Parameters(CountRequest {
                count_expression: "1".to_string(),
                detailed: false,
            }))
            .await
            .unwrap();
        assert_eq!(text(&counts), "App.Entity\nApp.Repository\nApp.Service");

        let cycles = server
            .td_query_circular_dependencies(Parameters(CyclesRequest::default()))
            .await
            .unwrap();
        assert_eq!(text(&cycles), "App.Entity -> App.Repository -> App.Entity");

        let invalid = server
            .td_query_dependents(Parameters(CountRequest {
                count_expression: "lots".to_string(),
                detailed: true,
            }))
            .await
            .unwrap();
        assert_eq!(invalid.is_error, Some(true));
        assert!(text(&invalid).starts_with("Error: Invalid count expression 'lots'"));
    }

    #[tokio::test]
    async fn test_export_tool() {
        let (dir, server) = generated_server().await;
        let output = dir.path().join("graph.mmd");

        let result = server
            .td_export(Parameters(ExportRequest {
                format: Some("mermaid".to_string()),
                output_path: Some(output.to_string_lossy().into_owned()),
            }))
            .await
            .unwrap();
        assert_eq!(
            text(&result),
            format!("Dependency graph exported to: {}", output.display())
        );
        assert!(fs::read_to_string(&output).unwrap().starts_with("```mermaid"));

        let unknown = server
            .td_export(Parameters(ExportRequest {
                format: Some("pdf".to_string()),
                output_path: None,
            }))
            .await
            .unwrap();
        assert_eq!(unknown.is_error, Some(true));
        assert!(text(&unknown).contains("Unknown export format: 'pdf'"));
    }

    #[tokio::test]
    async fn test_help_tool() {
        let (_dir, server) = server();
        let help = server.td_help().await.unwrap();
        assert!(text(&help).contains("td_query_circular_dependencies"));
    }
}
