/*!
 * Scheduler Core Operations
 * Admit, select, yield, block, unblock, destroy, and tick
 */

use super::{SchedState, Scheduler};
use crate::core::limits::DEFAULT_PRIORITY;
use crate::core::types::{Pid, Priority};
use crate::process::{Process, ProcessState, Runnable};
use crate::scheduler::types::{SchedulerError, SchedulerResult};
use log::info;
use std::sync::atomic::Ordering;
use std::time::Duration;

impl Scheduler {
    /// Admit a new process at the tail of the ready queue.
    ///
    /// The scheduler takes ownership of the body; the returned pid is the
    /// host's only reference to the record.
    pub fn spawn<R: Runnable + 'static>(&self, body: R) -> Pid {
        self.spawn_with_priority(body, DEFAULT_PRIORITY)
    }

    /// Admit with an explicit priority. Priority is carried on the record
    /// but selection is strictly FIFO.
    pub fn spawn_with_priority<R: Runnable + 'static>(&self, body: R, priority: Priority) -> Pid {
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write();
        self.table.insert(pid, Process::new(Box::new(body), priority));
        state.ready.push_back(pid);
        self.counters.inc_admitted();
        info!("process {} admitted to ready queue (priority {})", pid, priority);
        pid
    }

    /// Select the next process to run.
    ///
    /// A current record is first returned to the ready tail (readied, not
    /// blocked), then the head of the ready queue becomes current. Returns
    /// `None` when the ready queue is empty and nothing becomes current.
    pub fn schedule_next(&self) -> Option<Pid> {
        let mut state = self.state.write();
        self.schedule_next_locked(&mut state)
    }

    /// Voluntarily hand back the current record's turn.
    ///
    /// The current record is requeued at the ready tail and the next ready
    /// record is selected. Equivalent to `schedule_next` but named for the
    /// caller's intent.
    pub fn yield_current(&self) -> Option<Pid> {
        let mut state = self.state.write();
        if let Some(pid) = state.current {
            info!("process {} yielded", pid);
        }
        self.schedule_next_locked(&mut state)
    }

    /// Invoke the current record's body.
    ///
    /// No scheduler lock is held while the body runs, so the body may
    /// reenter the scheduler (yield, block, spawn, even kill itself).
    /// When the body returns normally and the record is still current, it
    /// goes back to the ready tail and stays reusable.
    pub fn run_current(&self) -> SchedulerResult<Pid> {
        let pid = self
            .state
            .read()
            .current
            .ok_or(SchedulerError::NoCurrentProcess)?;

        let body = self
            .table
            .get_mut(&pid)
            .and_then(|mut record| record.take_body());
        let mut body = body.ok_or(SchedulerError::AlreadyRunning(pid))?;

        body.run();

        // Reinstate the body unless the record was killed while running
        if let Some(mut record) = self.table.get_mut(&pid) {
            record.put_body(body);
        }

        let mut state = self.state.write();
        if state.current == Some(pid) {
            state.current = None;
            if let Some(mut record) = self.table.get_mut(&pid) {
                record.set_state(ProcessState::Ready);
                state.ready.push_back(pid);
            }
        }
        Ok(pid)
    }

    /// Move the current record to the tail of the blocked queue.
    pub fn block_current(&self) -> SchedulerResult<Pid> {
        let mut state = self.state.write();
        let pid = state
            .current
            .take()
            .ok_or(SchedulerError::NoCurrentProcess)?;
        self.mark(pid, ProcessState::Blocked);
        state.blocked.push_back(pid);
        info!("process {} blocked", pid);
        Ok(pid)
    }

    /// Move a blocked record back to the tail of the ready queue.
    pub fn unblock(&self, pid: Pid) -> SchedulerResult<()> {
        let mut state = self.state.write();
        let pos = state
            .blocked
            .iter()
            .position(|&p| p == pid)
            .ok_or(SchedulerError::NotFound(pid))?;
        state.blocked.remove(pos);
        self.mark(pid, ProcessState::Ready);
        state.ready.push_back(pid);
        info!("process {} unblocked, readmitted at ready tail", pid);
        Ok(())
    }

    /// Destroy a queued record.
    ///
    /// Searches the ready and blocked queues only; the current record is
    /// reserved for the privileged `kill` path. The record is marked
    /// terminated and released; it never re-enters any queue.
    pub fn remove(&self, pid: Pid) -> SchedulerResult<()> {
        let mut state = self.state.write();
        if !Self::evict_from_queues(&mut state, pid) {
            return Err(SchedulerError::NotFound(pid));
        }
        self.reap(pid);
        info!("process {} removed and destroyed", pid);
        Ok(())
    }

    /// Destroy a record wherever it lives: ready queue, blocked queue, or
    /// the current slot.
    pub fn kill(&self, pid: Pid) -> SchedulerResult<()> {
        let mut state = self.state.write();
        if state.current == Some(pid) {
            state.current = None;
        } else if !Self::evict_from_queues(&mut state, pid) {
            return Err(SchedulerError::NotFound(pid));
        }
        self.reap(pid);
        info!("process {} killed", pid);
        Ok(())
    }

    /// Advance the scheduler's clock by `elapsed` from the host's time
    /// source.
    ///
    /// Time-slice expiry is advisory: nothing interrupts an in-progress
    /// body; expiry only rotates the current slot the next time the host
    /// polls. When nothing is current after the expiry check, a selection
    /// is attempted anyway so ready work never sits idle. Returns the pid
    /// current after the tick.
    pub fn tick(&self, elapsed: Duration) -> Option<Pid> {
        self.counters.inc_ticks();
        let slice = *self.time_slice.read();
        let mut state = self.state.write();

        state.since_switch = state.since_switch.saturating_add(elapsed);
        if state.current.is_some() && state.since_switch >= slice {
            info!(
                "time slice expired after {:?}, rotating current process",
                state.since_switch
            );
            self.counters.inc_preemptions();
            self.schedule_next_locked(&mut state);
        }

        if state.current.is_none() {
            self.schedule_next_locked(&mut state);
        }

        state.current
    }

    /// Get the currently selected pid
    pub fn current(&self) -> Option<Pid> {
        self.state.read().current
    }

    /// Number of live records across both queues and the current slot
    pub fn len(&self) -> usize {
        let state = self.state.read();
        state.ready.len() + state.blocked.len() + usize::from(state.current.is_some())
    }

    /// Check if the scheduler holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lifecycle state of a record, if it is still owned by the scheduler
    pub fn process_state(&self, pid: Pid) -> Option<ProcessState> {
        self.table.get(&pid).map(|record| record.state())
    }

    /// Ready queue contents in scheduling order
    pub fn ready_pids(&self) -> Vec<Pid> {
        self.state.read().ready.iter().copied().collect()
    }

    /// Blocked queue contents in blocking order
    pub fn blocked_pids(&self) -> Vec<Pid> {
        self.state.read().blocked.iter().copied().collect()
    }

    /// Get the configured time slice
    pub fn time_slice(&self) -> Duration {
        *self.time_slice.read()
    }

    /// Reconfigure the time slice
    pub fn set_time_slice(&self, slice: Duration) {
        *self.time_slice.write() = slice;
    }

    fn schedule_next_locked(&self, state: &mut SchedState) -> Option<Pid> {
        if let Some(prev) = state.current.take() {
            self.mark(prev, ProcessState::Ready);
            state.ready.push_back(prev);
        }

        let next = state.ready.pop_front();
        if let Some(pid) = next {
            self.mark(pid, ProcessState::Running);
            state.current = Some(pid);
            state.since_switch = Duration::ZERO;
            self.counters.inc_context_switches();
            info!("scheduled process {}", pid);
        }
        next
    }

    fn evict_from_queues(state: &mut SchedState, pid: Pid) -> bool {
        if let Some(pos) = state.ready.iter().position(|&p| p == pid) {
            state.ready.remove(pos);
            true
        } else if let Some(pos) = state.blocked.iter().position(|&p| p == pid) {
            state.blocked.remove(pos);
            true
        } else {
            false
        }
    }

    fn mark(&self, pid: Pid, process_state: ProcessState) {
        if let Some(mut record) = self.table.get_mut(&pid) {
            record.set_state(process_state);
        }
    }

    fn reap(&self, pid: Pid) {
        self.mark(pid, ProcessState::Terminated);
        self.table.remove(&pid);
    }
}
