//! CLI argument parsing for devagents.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// devagents: a team of LLM agents that plans and builds a project.
///
/// A project manager agent breaks the configured goal into tasks; the
/// scheduler hands each task to its agent and runs the tools it asks for
/// inside the output folder.
#[derive(Parser, Debug)]
#[command(name = "devagents")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the model servers and run the agents until interrupted.
    ///
    /// Sends the goal to the project manager, then schedules the tasks it
    /// assigns. Commands the agents want to run are confirmed on stdin.
    Run(RunArgs),

    /// Validate a configuration file and list its agents.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the config file.
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Folder the agents work in. Created if missing.
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the config file.
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
