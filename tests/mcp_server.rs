//! The `typedeps mcp` server driven over stdio by an MCP client.

use std::collections::HashSet;
use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use rmcp::{
    model::{CallToolRequestParam, CallToolResult},
    service::ServiceExt,
    transport::TokioChildProcess,
};
use tokio::process::Command;

fn text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.as_text().map(|t| t.text.clone()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn test_mcp_session_workflow() -> Result<()> {
    let tmp = tempfile::tempdir().context("tempdir")?;
    let input = tmp.path().join("Shop.edges.json");
    fs::write(
        &input,
        r#"{
            "Shop.Orders.Order": ["Shop.Customers.Customer", "System.Guid"],
            "Shop.Customers.Customer": ["Shop.Orders.Order"]
        }"#,
    )
    .context("write edge list")?;

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_typedeps"));
    cmd.arg("--mcp");
    cmd.env("TYPEDEP_STATE_DIR", tmp.path().join("state"));
    cmd.env("RUST_LOG", "warn");

    let transport = TokioChildProcess::new(cmd).context("spawn mcp server")?;
    let service = tokio::time::timeout(Duration::from_secs(10), ().serve(transport))
        .await
        .context("timeout starting MCP server")??;

    let tools = service.list_tools(Default::default()).await?;
    let names: HashSet<&str> = tools.tools.iter().map(|t| t.name.as_ref()).collect();
    for expected in ["td_init", "td_add", "td_generate", "td_export", "td_help"] {
        assert!(names.contains(expected), "missing tool '{expected}'");
    }

    let call = |name: &'static str, arguments: serde_json::Value| CallToolRequestParam {
        name: name.into(),
        arguments: arguments.as_object().cloned(),
    };

    let init = service.call_tool(call("td_init", serde_json::json!({}))).await?;
    assert!(text(&init).starts_with("Session initialized: "));

    let added = service
        .call_tool(call(
            "td_add",
            serde_json::json!({ "inputPath": input.to_string_lossy() }),
        ))
        .await?;
    assert_ne!(added.is_error, Some(true), "td_add failed: {}", text(&added));

    let generated = service.call_tool(call("td_generate", serde_json::json!({}))).await?;
    assert!(text(&generated).ends_with("Found 2 types."));

    let cycles = service
        .call_tool(call("td_query_circular_dependencies", serde_json::json!({})))
        .await?;
    assert_eq!(
        text(&cycles),
        "Shop.Customers.Customer -> Shop.Orders.Order -> Shop.Customers.Customer"
    );

    let missing = service
        .call_tool(call(
            "td_query_dependencies_of",
            serde_json::json!({ "typeName": "System.Guid" }),
        ))
        .await?;
    assert_eq!(missing.is_error, Some(true));
    assert_eq!(
        text(&missing),
        "Error: Type 'System.Guid' not found in the dependency graph."
    );

    service.cancel().await?;
    Ok(())
}
