//! devagents: a task scheduler and tool dispatcher for a crew of local LLM
//! coding agents.
//!
//! This is the main entry point for the `devagents` CLI. It parses arguments,
//! sets up logging and the async runtime, dispatches to the command handler,
//! and maps errors to exit codes.

mod agent;
mod cli;
mod commands;
mod config;
mod error;
mod exit_codes;
mod logging;
mod ollama;
mod scheduler;
mod spawner;
mod task;
mod tools;
mod workspace;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;
use std::time::Duration;

/// How long to wait for blocked background work (a pending stdin read) at exit.
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(250);

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: failed to start async runtime: {}", err);
            return ExitCode::from(exit_codes::USER_ERROR as u8);
        }
    };

    let result = runtime.block_on(commands::dispatch(cli.command));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
