/*!
 * Lock-Free Scheduler Counters
 * Atomic counters for zero-contention stats tracking in scheduling paths
 */

use super::types::SchedulerStats;
use super::Scheduler;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic scheduler counters for lock-free updates.
///
/// Counter values may not be perfectly consistent with each other under
/// concurrent updates, but each individual value is accurate, which is
/// enough for monitoring.
#[derive(Debug, Default)]
pub(super) struct AtomicCounters {
    admitted: AtomicU64,
    context_switches: AtomicU64,
    preemptions: AtomicU64,
    ticks: AtomicU64,
}

impl AtomicCounters {
    #[inline(always)]
    pub fn inc_admitted(&self) {
        self.admitted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_context_switches(&self) {
        self.context_switches.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_preemptions(&self) {
        self.preemptions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_ticks(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn admitted(&self) -> u64 {
        self.admitted.load(Ordering::Relaxed)
    }

    pub fn context_switches(&self) -> u64 {
        self.context_switches.load(Ordering::Relaxed)
    }

    pub fn preemptions(&self) -> u64 {
        self.preemptions.load(Ordering::Relaxed)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Scheduler {
    /// Get scheduler statistics.
    ///
    /// `total_count` is ready + blocked + (1 if a record is current).
    /// Pure read; no queue is mutated.
    pub fn stats(&self) -> SchedulerStats {
        let (ready_count, blocked_count, has_current) = {
            let state = self.state.read();
            (
                state.ready.len(),
                state.blocked.len(),
                state.current.is_some(),
            )
        };

        SchedulerStats {
            ready_count,
            blocked_count,
            total_count: ready_count + blocked_count + usize::from(has_current),
            admitted: self.counters.admitted(),
            context_switches: self.counters.context_switches(),
            preemptions: self.counters.preemptions(),
            ticks: self.counters.ticks(),
            time_slice_micros: self.time_slice.read().as_micros() as u64,
        }
    }
}
