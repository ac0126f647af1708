//! Implementation of the `devagents run` command.
//!
//! Startup order:
//! 1. Load the config and create the output folder
//! 2. Start one model server per agent and open its session
//! 3. Send the goal to the project manager and run its tool calls
//! 4. Schedule tasks until interrupted or a task fails
//!
//! Model servers are always stopped on the way out; failures there are
//! logged and do not change the exit code.

use crate::agent::{AgentRegistry, AgentSession};
use crate::cli::RunArgs;
use crate::config::{Config, PROJECT_MANAGER};
use crate::error::{DevAgentsError, Result};
use crate::ollama::OllamaClient;
use crate::scheduler::{SchedulerHandle, TaskScheduler};
use crate::spawner::{SpawnError, Spawner, spawner_for};
use crate::task::{TaskStatus, TaskStore};
use crate::tools::{LineGate, ToolRegistry};
use crate::workspace::Workspace;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A started model server and the agent it serves.
struct ServedAgent {
    agent: String,
    spawner: Box<dyn Spawner>,
}

/// Execute the `devagents run` command.
pub async fn cmd_run(args: RunArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    tracing::info!(goal = %config.goal, "the goal for the project");

    let workspace = Workspace::create(&args.output).await?;
    tracing::info!(path = %workspace.root().display(), "output folder ready");

    let handle = SchedulerHandle::new();
    let signals = tokio::spawn(stop_on_signal(handle.clone()));

    let mut servers = Vec::new();
    let result = run_team(&config, workspace, &mut servers, handle).await;

    signals.abort();
    teardown(servers).await;
    result
}

async fn run_team(
    config: &Config,
    workspace: Workspace,
    servers: &mut Vec<ServedAgent>,
    handle: SchedulerHandle,
) -> Result<()> {
    let agents = start_agents(config, servers, handle.shutdown_token()).await?;

    let tools = ToolRegistry::with_builtin();
    warn_unhandled_tools(config, &tools);

    let gate = Arc::new(LineGate::stdin());
    let mut scheduler = TaskScheduler::new(agents, tools, workspace, gate, handle.clone());

    scheduler.prompt_agent(PROJECT_MANAGER, &config.goal).await?;

    let result = scheduler.run().await;
    if let Err(DevAgentsError::TaskFailed { id, .. }) = &result
        && let Some(task) = handle.tasks().get_task(id)
    {
        tracing::error!(
            task_id = %task.id,
            assigned_to = %task.assigned_to,
            task = %task.description,
            "task halted the run"
        );
    }

    let agents: Vec<&str> = config.agent_names().collect();
    print!("{}", render_summary(handle.tasks(), &agents));
    result
}

/// Start a server for every agent and build its session.
///
/// Each spawner is recorded in `servers` before it starts so teardown also
/// reaches a server whose startup failed half way.
async fn start_agents(
    config: &Config,
    servers: &mut Vec<ServedAgent>,
    cancel: &CancellationToken,
) -> Result<AgentRegistry> {
    let mut registry = AgentRegistry::new();

    for agent in &config.agents {
        let spawn_error = |source: SpawnError| DevAgentsError::Spawn {
            agent: agent.name.clone(),
            source,
        };

        servers.push(ServedAgent {
            agent: agent.name.clone(),
            spawner: spawner_for(&config.engine)?,
        });
        let Some(server) = servers.last_mut() else {
            continue;
        };

        server.spawner.spawn(cancel).await.map_err(spawn_error)?;
        let base_url = server.spawner.base_url().ok_or_else(|| {
            spawn_error(SpawnError::ProcessExited("server address unknown".to_string()))
        })?;

        tracing::info!(agent = %agent.name, model = %agent.model, url = %base_url, "agent ready");

        let client = OllamaClient::new(base_url);
        registry.insert(Box::new(AgentSession::new(agent.clone(), Arc::new(client))));
    }

    Ok(registry)
}

fn warn_unhandled_tools(config: &Config, tools: &ToolRegistry) {
    for agent in &config.agents {
        for name in agent.tool_names() {
            if !tools.contains(name) {
                tracing::warn!(agent = %agent.name, tool = %name, "declared tool has no handler");
            }
        }
    }
}

async fn teardown(servers: Vec<ServedAgent>) {
    for mut server in servers {
        if let Err(e) = server.spawner.stop().await {
            tracing::error!(agent = %server.agent, error = %e, "error tearing down agent");
        }
    }
}

/// Stop the scheduler on Ctrl-C, or SIGTERM on unix.
async fn stop_on_signal(handle: SchedulerHandle) {
    wait_for_signal().await;
    tracing::info!("shutting down");
    handle.stop();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for SIGTERM");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Status counts, then each agent's tasks in roster order. Tasks assigned
/// to a name outside the roster are listed last.
fn render_summary(tasks: &TaskStore, agents: &[&str]) -> String {
    let (pending, in_progress, completed, failed) = tasks.counts();
    let all = tasks.list_tasks();

    let mut out = String::new();
    out.push_str("\nTask Summary\n");
    out.push_str("============\n");
    for (status, count) in [
        (TaskStatus::Pending, pending),
        (TaskStatus::InProgress, in_progress),
        (TaskStatus::Completed, completed),
        (TaskStatus::Failed, failed),
    ] {
        out.push_str(&format!("  {:12} {:>3}\n", status.to_string(), count));
    }
    out.push_str("  ------------\n");
    out.push_str(&format!("  {:12} {:>3}\n", "total", all.len()));

    if all.is_empty() {
        return out;
    }

    out.push_str("\nTasks:\n");
    for agent in agents {
        let assigned = tasks.list_tasks_by_assignee(agent);
        if assigned.is_empty() {
            continue;
        }
        out.push_str(&format!("  {}:\n", agent));
        for task in assigned {
            out.push_str(&format!("    [{}] {}\n", task.status, task.description));
        }
    }

    let unknown: Vec<_> = all
        .iter()
        .filter(|t| !agents.contains(&t.assigned_to.as_str()))
        .collect();
    if !unknown.is_empty() {
        out.push_str("  (unknown agent):\n");
        for task in unknown {
            out.push_str(&format!(
                "    [{}] {}: {}\n",
                task.status, task.assigned_to, task.description
            ));
        }
    }
    out
}
