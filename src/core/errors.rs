/*!
 * Error Types
 * Centralized error handling with thiserror and miette support
 */

use miette::Diagnostic;
use thiserror::Error;

// Re-export MemoryError from memory module
pub use crate::memory::MemoryError;

// Re-export SchedulerError from scheduler module
pub use crate::scheduler::SchedulerError;

// Re-export IoError from io module
pub use crate::io::IoError;

/// Unified runtime error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum RuntimeError {
    #[error("memory error: {0}")]
    #[diagnostic(
        code(runlet::memory),
        help("Check the allocator's capacity and the validity of the handle.")
    )]
    Memory(#[from] MemoryError),

    #[error("scheduler error: {0}")]
    #[diagnostic(
        code(runlet::scheduler),
        help("The process may have been killed or was never admitted.")
    )]
    Scheduler(#[from] SchedulerError),

    #[error("io error: {0}")]
    #[diagnostic(
        code(runlet::io),
        help("A standard stream operation failed. Check the host environment.")
    )]
    Io(#[from] IoError),
}
