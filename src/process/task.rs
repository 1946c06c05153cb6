/*!
 * Process Record
 * A schedulable unit of cooperative work: a callable plus its lifecycle state
 */

use super::types::ProcessState;
use crate::core::types::Priority;
use std::fmt;

/// A callable unit of cooperative work.
///
/// Implemented for free by any `FnMut() + Send + Sync` closure, which owns
/// whatever context it captured. Bodies run to completion or hand control
/// back by calling yield/block on the scheduler that owns them.
pub trait Runnable: Send + Sync {
    fn run(&mut self);
}

impl<F> Runnable for F
where
    F: FnMut() + Send + Sync,
{
    fn run(&mut self) {
        (self)()
    }
}

/// One schedulable process record.
///
/// Owned exclusively by the scheduler after admission; the host keeps only
/// the pid for issuing block/unblock/kill requests by identity.
pub struct Process {
    body: Option<Box<dyn Runnable>>,
    state: ProcessState,
    priority: Priority,
}

impl Process {
    #[must_use]
    pub fn new(body: Box<dyn Runnable>, priority: Priority) -> Self {
        Self {
            body: Some(body),
            state: ProcessState::Ready,
            priority,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> ProcessState {
        self.state
    }

    #[inline]
    pub fn set_state(&mut self, state: ProcessState) {
        self.state = state;
    }

    #[inline]
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Take the callable out of the record for invocation.
    ///
    /// The scheduler must not hold any lock while the body runs, so the
    /// body leaves the record during the call and is reinstated after.
    pub(crate) fn take_body(&mut self) -> Option<Box<dyn Runnable>> {
        self.body.take()
    }

    pub(crate) fn put_body(&mut self, body: Box<dyn Runnable>) {
        self.body = Some(body);
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("state", &self.state)
            .field("priority", &self.priority)
            .field("body_taken", &self.body.is_none())
            .finish()
    }
}
