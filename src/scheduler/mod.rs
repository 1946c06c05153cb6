/*!
 * Cooperative Scheduler
 *
 * Multiplexes process records onto a single thread of control using a
 * ready queue, a blocked queue, and at most one current record. Selection
 * is strictly FIFO over the ready queue; time-slice rotation is advisory
 * and driven by the host through `tick`.
 *
 * All queue relocation happens under one lock per instance, so a record
 * is always a member of exactly one of {ready, blocked, current}. The
 * time-slice accumulator is scoped to the instance; ticking one scheduler
 * never rotates another.
 */

mod operations;
mod stats;
mod types;

pub use types::{SchedulerError, SchedulerResult, SchedulerStats};

use crate::core::limits::{DEFAULT_TIME_SLICE, INITIAL_PID};
use crate::core::types::Pid;
use crate::process::Process;
use ahash::RandomState;
use dashmap::DashMap;
use log::info;
use parking_lot::RwLock;
use stats::AtomicCounters;
use std::collections::VecDeque;
use std::sync::atomic::AtomicU32;
use std::sync::Arc;
use std::time::Duration;

/// Queue state guarded by a single lock per scheduler instance.
///
/// Relocating a record between containers mutates two fields, so the whole
/// struct sits behind one lock rather than one lock per queue.
#[derive(Debug, Default)]
struct SchedState {
    ready: VecDeque<Pid>,
    blocked: VecDeque<Pid>,
    current: Option<Pid>,
    since_switch: Duration,
}

/// Cooperative process scheduler
pub struct Scheduler {
    state: Arc<RwLock<SchedState>>,
    table: Arc<DashMap<Pid, Process, RandomState>>,
    time_slice: Arc<RwLock<Duration>>,
    next_pid: Arc<AtomicU32>,
    counters: Arc<AtomicCounters>,
}

impl Scheduler {
    /// Create a scheduler with the default time slice
    pub fn new() -> Self {
        Self::with_time_slice(DEFAULT_TIME_SLICE)
    }

    /// Create a scheduler with a custom time slice
    pub fn with_time_slice(time_slice: Duration) -> Self {
        info!("scheduler initialized with {:?} time slice", time_slice);
        Self {
            state: Arc::new(RwLock::new(SchedState::default())),
            table: Arc::new(DashMap::with_hasher(RandomState::new())),
            time_slice: Arc::new(RwLock::new(time_slice)),
            next_pid: Arc::new(AtomicU32::new(INITIAL_PID)),
            counters: Arc::new(AtomicCounters::default()),
        }
    }
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            table: Arc::clone(&self.table),
            time_slice: Arc::clone(&self.time_slice),
            next_pid: Arc::clone(&self.next_pid),
            counters: Arc::clone(&self.counters),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessState;

    fn noop() -> impl FnMut() + Send + Sync {
        || {}
    }

    #[test]
    fn test_admission_is_fifo() {
        let scheduler = Scheduler::new();

        let a = scheduler.spawn(noop());
        let b = scheduler.spawn(noop());
        let c = scheduler.spawn(noop());

        assert_eq!(scheduler.ready_pids(), vec![a, b, c]);
        assert_eq!(scheduler.schedule_next(), Some(a));
        assert_eq!(scheduler.current(), Some(a));
        assert_eq!(scheduler.process_state(a), Some(ProcessState::Running));
    }

    #[test]
    fn test_yield_rotates_to_tail() {
        let scheduler = Scheduler::new();

        let a = scheduler.spawn(noop());
        let b = scheduler.spawn(noop());

        assert_eq!(scheduler.schedule_next(), Some(a));
        assert_eq!(scheduler.yield_current(), Some(b));
        assert_eq!(scheduler.ready_pids(), vec![a]);
    }

    #[test]
    fn test_block_and_unblock() {
        let scheduler = Scheduler::new();

        let a = scheduler.spawn(noop());
        let b = scheduler.spawn(noop());

        scheduler.schedule_next();
        assert_eq!(scheduler.block_current(), Ok(a));
        assert_eq!(scheduler.process_state(a), Some(ProcessState::Blocked));
        assert_eq!(scheduler.current(), None);

        // Unblock lands at the ready tail, behind b
        scheduler.unblock(a).unwrap();
        assert_eq!(scheduler.ready_pids(), vec![b, a]);
    }

    #[test]
    fn test_block_without_current() {
        let scheduler = Scheduler::new();
        assert_eq!(scheduler.block_current(), Err(SchedulerError::NoCurrentProcess));
    }

    #[test]
    fn test_unblock_not_blocked() {
        let scheduler = Scheduler::new();
        let a = scheduler.spawn(noop());
        assert_eq!(scheduler.unblock(a), Err(SchedulerError::NotFound(a)));
    }

    #[test]
    fn test_remove_skips_current() {
        let scheduler = Scheduler::new();
        let a = scheduler.spawn(noop());

        scheduler.schedule_next();
        assert_eq!(scheduler.remove(a), Err(SchedulerError::NotFound(a)));

        // The privileged path reaches the current slot
        assert_eq!(scheduler.kill(a), Ok(()));
        assert_eq!(scheduler.current(), None);
        assert_eq!(scheduler.process_state(a), None);
    }

    #[test]
    fn test_tick_accumulates_deterministically() {
        let scheduler = Scheduler::with_time_slice(Duration::from_millis(100));

        let a = scheduler.spawn(noop());
        let b = scheduler.spawn(noop());

        assert_eq!(scheduler.schedule_next(), Some(a));

        // 60ms elapsed: under the slice, no rotation
        assert_eq!(scheduler.tick(Duration::from_millis(60)), Some(a));
        // 120ms accumulated: rotation to b
        assert_eq!(scheduler.tick(Duration::from_millis(60)), Some(b));
        assert_eq!(scheduler.stats().preemptions, 1);
    }

    #[test]
    fn test_tick_selects_when_idle() {
        let scheduler = Scheduler::new();
        let a = scheduler.spawn(noop());

        assert_eq!(scheduler.current(), None);
        assert_eq!(scheduler.tick(Duration::ZERO), Some(a));
    }

    #[test]
    fn test_instances_do_not_share_slice_accounting() {
        let first = Scheduler::with_time_slice(Duration::from_millis(100));
        let second = Scheduler::with_time_slice(Duration::from_millis(100));

        let a = first.spawn(noop());
        let b = first.spawn(noop());
        let x = second.spawn(noop());
        let _y = second.spawn(noop());

        first.schedule_next();
        second.schedule_next();

        // Exhaust the first instance's slice; the second is untouched
        assert_eq!(first.tick(Duration::from_millis(150)), Some(b));
        assert_eq!(second.current(), Some(x));
        assert_eq!(second.stats().preemptions, 0);
        let _ = a;
    }

    #[test]
    fn test_stats_counts() {
        let scheduler = Scheduler::new();

        let _a = scheduler.spawn(noop());
        let _b = scheduler.spawn(noop());
        let _c = scheduler.spawn(noop());

        scheduler.schedule_next();
        scheduler.block_current().unwrap();
        scheduler.schedule_next();

        let stats = scheduler.stats();
        assert_eq!(stats.ready_count, 1);
        assert_eq!(stats.blocked_count, 1);
        assert_eq!(stats.total_count, 3);
        assert_eq!(stats.admitted, 3);
    }
}
