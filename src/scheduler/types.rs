/*!
 * Scheduler Types
 * Errors and statistics for the cooperative scheduler
 */

use crate::core::types::Pid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheduler operation result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("process {0} not found")]
    NotFound(Pid),

    #[error("no process is currently scheduled")]
    NoCurrentProcess,

    #[error("process {0} is already running")]
    AlreadyRunning(Pid),
}

/// Scheduler statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    pub ready_count: usize,
    pub blocked_count: usize,
    pub total_count: usize,
    pub admitted: u64,
    pub context_switches: u64,
    pub preemptions: u64,
    pub ticks: u64,
    pub time_slice_micros: u64,
}
