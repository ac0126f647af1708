//! Exit code constants for the devagents CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config)
//! - 2: Task failure (the scheduler halted on a failed task)
//! - 3: Model server failure (spawn, health check, chat transport)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// A task failed and the scheduler stopped.
pub const TASK_FAILURE: i32 = 2;

/// The model server could not be started or reached.
pub const MODEL_FAILURE: i32 = 3;
