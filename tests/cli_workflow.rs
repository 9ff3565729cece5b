//! End-to-end runs of the `typedeps` binary against a private state directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn typedeps(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_typedeps"))
            .args(args)
            .env("TYPEDEP_STATE_DIR", self.path("state"))
            .env_remove("RUST_LOG")
            .current_dir(self.dir.path())
            .output()
            .unwrap()
    }

    fn ok(&self, args: &[&str]) -> String {
        let output = self.typedeps(args);
        assert!(
            output.status.success(),
            "typedeps {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    fn fail(&self, args: &[&str]) -> String {
        let output = self.typedeps(args);
        assert_eq!(output.status.code(), Some(1), "typedeps {:?} should fail", args);
        String::from_utf8(output.stderr).unwrap()
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

const CORE_MODULE: &str = r#"{
    "Shop.Orders.OrderService": ["Shop.Orders.Order", "Shop.Data.Repository`1", "System.Threading.Tasks.Task"],
    "Shop.Orders.Order": ["Shop.Orders.OrderLine[]", "Shop.Customers.Customer"],
    "Shop.Customers.Customer": ["Shop.Orders.Order"]
}"#;

const WEB_MODULE: &str = r#"{
    "Shop.Web.OrdersController": ["Shop.Orders.OrderService", "Microsoft.AspNetCore.Mvc.ControllerBase"],
    "Shop.Web.OrdersController+<>c": ["Shop.Orders.Order"]
}"#;

#[test]
fn test_full_session_workflow() {
    let ws = Workspace::new();
    let core = ws.write("core.json", CORE_MODULE);
    let web = ws.write("web.json", WEB_MODULE);

    assert!(ws.ok(&["init"]).starts_with("Session initialized: "));
    assert_eq!(
        ws.ok(&["add", arg(&core)]),
        format!("Added input: {}\n", fs::canonicalize(&core).unwrap().display())
    );
    ws.ok(&["add", arg(&web)]);

    let generated = ws.ok(&["generate"]);
    assert!(generated.ends_with("Dependency graph generated successfully. Found 5 types.\n"));

    assert_eq!(
        ws.ok(&["query", "dependents-of", "Shop.Orders.Order"]),
        "Shop.Customers.Customer\nShop.Orders.OrderService\nShop.Web.OrdersController+<>c\n"
    );
    assert_eq!(
        ws.ok(&["query", "dependencies-of", "Shop.Web.OrdersController"]),
        "Shop.Orders.OrderService\n"
    );
    assert_eq!(
        ws.ok(&["query", "transitive-dependents-of", "Shop.Customers.Customer"]),
        "Shop.Orders.Order\nShop.Orders.OrderService\nShop.Web.OrdersController\nShop.Web.OrdersController+<>c\n"
    );
    assert_eq!(
        ws.ok(&["query", "cycles"]),
        "Shop.Customers.Customer -> Shop.Orders.Order -> Shop.Customers.Customer\n"
    );
    assert_eq!(
        ws.ok(&["query", "dependents", ">=2"]),
        "Shop.Orders.Order\n"
    );
}

#[test]
fn test_export_formats_default_paths() {
    let ws = Workspace::new();
    let core = ws.write("core.json", CORE_MODULE);
    ws.ok(&["init"]);
    ws.ok(&["add", arg(&core)]);
    ws.ok(&["generate"]);

    for (format, file) in [
        ("dot", "type-dependencies.dot"),
        ("json", "type-dependencies.json"),
        ("mermaid", "type-dependencies.mmd"),
        ("html", "type-dependencies.html"),
    ] {
        let stdout = ws.ok(&["export", "--format", format]);
        assert!(stdout.starts_with("Dependency graph exported to: "));
        assert!(stdout.trim_end().ends_with(file));
        assert!(ws.path(file).is_file(), "{} was not written", file);
    }

    let mermaid = fs::read_to_string(ws.path("type-dependencies.mmd")).unwrap();
    assert!(mermaid.starts_with("```mermaid\ngraph TD\n"));
    assert!(mermaid.contains("Shop_Orders_Order[\"Shop.Orders.Order\"] --> Shop_Customers_Customer[\"Shop.Customers.Customer\"]"));

    let html = fs::read_to_string(ws.path("type-dependencies.html")).unwrap();
    assert!(html.contains("<title>Type Dependencies</title>"));
    assert!(html.contains("\"Name\": \"Shop.Orders.OrderLine[]\""));
}

#[test]
fn test_finalize_clears_session() {
    let ws = Workspace::new();
    let core = ws.write("core.json", CORE_MODULE);
    ws.ok(&["init"]);
    ws.ok(&["add", arg(&core)]);

    let out = ws.path("out.json");
    let stdout = ws.ok(&["finalize", "-f", "json", "-o", arg(&out)]);
    assert!(stdout.contains("Analyzing: "));

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(
        exported["Shop.Orders.OrderService"],
        serde_json::json!(["Shop.Data.Repository`1", "Shop.Orders.Order"])
    );

    let stderr = ws.fail(&["generate"]);
    assert!(stderr.contains("No active session found"));
}

#[test]
fn test_errors_exit_with_status_one() {
    let ws = Workspace::new();

    assert!(ws.fail(&["query", "cycles"]).contains("No active session found"));

    ws.ok(&["init"]);
    assert!(ws
        .fail(&["add", arg(&ws.path("missing.json"))])
        .contains("Input file not found"));
    assert!(ws.fail(&["export"]).contains("No generated graph found"));

    let broken = ws.write("broken.json", "[1, 2, 3]");
    ws.ok(&["add", arg(&broken)]);
    let stderr = ws.fail(&["generate"]);
    assert!(stderr.contains("Error analyzing"));
    assert!(stderr.contains("Invalid edge list"));
}

#[test]
fn test_invalid_count_expression() {
    let ws = Workspace::new();
    let core = ws.write("core.json", CORE_MODULE);
    ws.ok(&["init"]);
    ws.ok(&["add", arg(&core)]);
    ws.ok(&["generate"]);

    let stderr = ws.fail(&["query", "dependencies", "a-b"]);
    assert!(stderr.contains("Invalid count expression 'a-b'"));
}
