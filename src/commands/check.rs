//! Implementation of the `devagents check` command.

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::Result;
use crate::tools::ToolRegistry;

/// Execute the `devagents check` command.
///
/// Loads and validates the config, then prints each agent with its model
/// and tools. Tools without a built-in handler are flagged.
pub fn cmd_check(args: CheckArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    print!("{}", render(&config, &ToolRegistry::with_builtin()));
    Ok(())
}

fn render(config: &Config, tools: &ToolRegistry) -> String {
    let mut out = String::new();
    out.push_str("Config OK\n");
    out.push_str("=========\n\n");
    out.push_str(&format!("Engine: {}\n", config.engine));
    if !config.goal.is_empty() {
        out.push_str(&format!("Goal:   {}\n", config.goal));
    }
    out.push_str(&format!("Tools:  {}\n", tools.names().join(", ")));
    out.push('\n');

    out.push_str(&format!("Agents ({}):\n", config.agents.len()));
    for agent in &config.agents {
        out.push_str(&format!("  {} (model: {})\n", agent.name, agent.model));
        for name in agent.tool_names() {
            let marker = if tools.contains(name) { "" } else { " [no handler]" };
            out.push_str(&format!("    - {}{}\n", name, marker));
        }
    }
    out
}
