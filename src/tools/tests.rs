use super::*;
use crate::task::TaskStatus;
use crate::test_support::{FixedGate, ToolFixture};
use serde_json::json;

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("arguments must be an object"),
    }
}

#[test]
fn test_builtin_registry_names() {
    let registry = ToolRegistry::with_builtin();
    assert_eq!(
        registry.names(),
        vec![
            "assign-task",
            "edit-file",
            "list-files",
            "read-file",
            "run-command",
            "write-file"
        ]
    );
}

#[tokio::test]
async fn test_unknown_tool() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();

    let err = registry
        .call("delete-everything", Map::new(), fixture.ctx())
        .await
        .unwrap_err();

    assert!(matches!(err, DevAgentsError::ToolNotFound(_)));
    assert_eq!(err.to_string(), "tool 'delete-everything' not found");
}

#[tokio::test]
async fn test_assign_task_appends_pending_task() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();

    let output = registry
        .call(
            "assign-task",
            args(json!({"assignee": "worker2", "task": "write README"})),
            fixture.ctx(),
        )
        .await
        .unwrap();

    assert_eq!(output, "");
    let tasks = fixture.tasks.list_tasks_by_assignee("worker2");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].description, "write README");
    assert_eq!(tasks[0].status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_missing_argument_is_invalid() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();

    let err = registry
        .call("assign-task", args(json!({"assignee": "worker2"})), fixture.ctx())
        .await
        .unwrap_err();

    match err {
        DevAgentsError::Tool { tool, source } => {
            assert_eq!(tool, "assign-task");
            assert!(matches!(source, ToolError::InvalidArguments(msg) if msg.contains("task")));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(fixture.tasks.list_tasks().is_empty());
}

#[tokio::test]
async fn test_wrong_argument_type_is_invalid() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();

    let err = registry
        .call("write-file", args(json!({"file": "a.txt", "content": 42})), fixture.ctx())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DevAgentsError::Tool { source: ToolError::InvalidArguments(_), .. }
    ));
    assert!(!fixture.root().join("a.txt").exists());
}

#[tokio::test]
async fn test_write_then_read_round_trips() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();
    let content = "fn main() {\n    println!(\"hi\");\n}\n";

    registry
        .call("write-file", args(json!({"file": "src/main.rs", "content": content})), fixture.ctx())
        .await
        .unwrap();
    let read = registry
        .call("read-file", args(json!({"file": "src/main.rs"})), fixture.ctx())
        .await
        .unwrap();

    assert_eq!(read, content);
}

#[cfg(unix)]
#[tokio::test]
async fn test_written_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();

    registry
        .call("write-file", args(json!({"file": "notes.txt", "content": "x"})), fixture.ctx())
        .await
        .unwrap();

    let mode = std::fs::metadata(fixture.root().join("notes.txt"))
        .unwrap()
        .permissions()
        .mode();
    // The process umask may clear bits but never adds any.
    assert_eq!(mode & 0o777 & !0o644, 0);
}

#[tokio::test]
async fn test_edit_file_replaces_contents() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();
    std::fs::write(fixture.root().join("README.md"), "a much longer original text").unwrap();

    registry
        .call("edit-file", args(json!({"file": "README.md", "content": "short"})), fixture.ctx())
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(fixture.root().join("README.md")).unwrap(), "short");
}

#[tokio::test]
async fn test_read_missing_file() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();

    let err = registry
        .call("read-file", args(json!({"file": "missing.txt"})), fixture.ctx())
        .await
        .unwrap_err();

    assert!(matches!(err, DevAgentsError::Tool { source: ToolError::Io { .. }, .. }));
}

#[tokio::test]
async fn test_write_outside_root_rejected() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();

    let err = registry
        .call("write-file", args(json!({"file": "../escape.txt", "content": "x"})), fixture.ctx())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DevAgentsError::Tool { source: ToolError::PathEscapesRoot(_), .. }
    ));
    assert!(!fixture.temp.path().join("escape.txt").exists());
}

#[tokio::test]
async fn test_list_files_sorted() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();
    std::fs::create_dir(fixture.root().join("src")).unwrap();
    std::fs::write(fixture.root().join("b.txt"), "").unwrap();
    std::fs::write(fixture.root().join("a.txt"), "").unwrap();
    std::fs::write(fixture.root().join("src/lib.rs"), "").unwrap();

    let root = registry.call("list-files", Map::new(), fixture.ctx()).await.unwrap();
    let src = registry
        .call("list-files", args(json!({"working_directory": "src"})), fixture.ctx())
        .await
        .unwrap();

    assert_eq!(root, "a.txt\nb.txt\nsrc");
    assert_eq!(src, "lib.rs");
}

#[tokio::test]
async fn test_list_files_missing_directory() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();

    let err = registry
        .call("list-files", args(json!({"working_directory": "nope"})), fixture.ctx())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("working directory does not exist"));
}

#[tokio::test]
async fn test_run_command_missing_directory_never_prompts() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();

    let err = registry
        .call(
            "run-command",
            args(json!({"command": "touch ran.txt", "working_directory": "does/not/exist"})),
            fixture.ctx(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DevAgentsError::Tool { source: ToolError::WorkingDirectoryNotFound(_), .. }
    ));
    assert_eq!(fixture.gate.asked(), 0);
    assert!(!fixture.root().join("ran.txt").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_command_returns_stdout() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();
    std::fs::create_dir(fixture.root().join("app")).unwrap();

    let output = registry
        .call(
            "run-command",
            args(json!({"command": "pwd", "working_directory": "app"})),
            fixture.ctx(),
        )
        .await
        .unwrap();

    assert!(output.trim_end().ends_with("app"));
    assert_eq!(fixture.gate.asked(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_command_splits_on_whitespace_only() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();

    let apostrophe = registry
        .call("run-command", args(json!({"command": "echo don't panic"})), fixture.ctx())
        .await
        .unwrap();
    assert_eq!(apostrophe, "don't panic\n");

    let quoted = registry
        .call("run-command", args(json!({"command": "echo \"a   b\""})), fixture.ctx())
        .await
        .unwrap();
    assert_eq!(quoted, "\"a b\"\n");
    assert_eq!(fixture.gate.asked(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_command_declined() {
    let fixture = ToolFixture::with_gate(FixedGate::declining()).await;
    let registry = ToolRegistry::with_builtin();

    let err = registry
        .call("run-command", args(json!({"command": "touch ran.txt"})), fixture.ctx())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "tool 'run-command' failed: command execution skipped by user"
    );
    assert!(!fixture.root().join("ran.txt").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_command_non_zero_exit() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();

    let err = registry
        .call("run-command", args(json!({"command": "ls missing-entry"})), fixture.ctx())
        .await
        .unwrap_err();

    match err {
        DevAgentsError::Tool { source: ToolError::CommandFailed { stderr, .. }, .. } => {
            assert!(stderr.contains("missing-entry"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_run_command_empty() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();

    let err = registry
        .call("run-command", args(json!({"command": "   "})), fixture.ctx())
        .await
        .unwrap_err();

    assert!(matches!(err, DevAgentsError::Tool { source: ToolError::EmptyCommand, .. }));
    assert_eq!(fixture.gate.asked(), 0);
}

#[tokio::test]
async fn test_dispatch_stops_at_first_failure() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();
    let calls = vec![
        ToolCall::new("write-file", json!({"file": "one.txt", "content": "1"})),
        ToolCall::new("read-file", json!({"file": "missing.txt"})),
        ToolCall::new("write-file", json!({"file": "three.txt", "content": "3"})),
    ];

    let err = registry.dispatch_all(&calls, fixture.ctx()).await.unwrap_err();

    assert!(matches!(&err, DevAgentsError::Tool { tool, .. } if tool == "read-file"));
    assert!(fixture.root().join("one.txt").exists());
    assert!(!fixture.root().join("three.txt").exists());
}

#[tokio::test]
async fn test_dispatch_all_collects_outputs() {
    let fixture = ToolFixture::new().await;
    let registry = ToolRegistry::with_builtin();
    let calls = vec![
        ToolCall::new("write-file", json!({"file": "a.txt", "content": "alpha"})),
        ToolCall::new("read-file", json!({"file": "a.txt"})),
    ];

    let outputs = registry.dispatch_all(&calls, fixture.ctx()).await.unwrap();

    assert_eq!(outputs, vec![String::new(), "alpha".to_string()]);
}

#[tokio::test]
async fn test_register_custom_tool() {
    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn call(
            &self,
            args: Map<String, Value>,
            _ctx: ToolContext<'_>,
        ) -> std::result::Result<String, ToolError> {
            Ok(Value::Object(args).to_string())
        }
    }

    let fixture = ToolFixture::new().await;
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(Echo));

    assert!(registry.contains("echo"));
    let output = registry
        .call("echo", args(json!({"x": 1})), fixture.ctx())
        .await
        .unwrap();
    assert_eq!(output, "{\"x\":1}");
}
