/*!
 * Process Types
 * Lifecycle state for schedulable units of work
 */

use serde::{Deserialize, Serialize};

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Eligible for selection from the ready queue
    Ready,
    /// Currently selected as the running unit
    Running,
    /// Excluded from selection until explicitly unblocked
    Blocked,
    /// Destroyed; never re-enters any queue
    Terminated,
}

impl ProcessState {
    /// Check if the process is ready
    #[inline(always)]
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, ProcessState::Ready)
    }

    /// Check if the process is running
    #[inline(always)]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, ProcessState::Running)
    }

    /// Check if the process is blocked
    #[inline(always)]
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, ProcessState::Blocked)
    }

    /// Check if the process has terminated
    #[inline(always)]
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        matches!(self, ProcessState::Terminated)
    }
}
