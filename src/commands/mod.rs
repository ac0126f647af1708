//! Command implementations for devagents.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod check;
mod run;

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub async fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run::cmd_run(args).await,
        Command::Check(args) => check::cmd_check(args),
    }
}
