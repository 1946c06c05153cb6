/*!
 * Runtime Façade
 * Wires the allocator, scheduler, and stream I/O together for a host
 */

use crate::core::limits::{DEFAULT_MEMORY_POOL, DEFAULT_TIME_SLICE};
use crate::core::types::{Handle, Pid, Size};
use crate::io::StreamIo;
use crate::memory::{BlockAllocator, MemoryResult, MemoryStats};
use crate::process::Runnable;
use crate::scheduler::{Scheduler, SchedulerStats};
use crate::verify::Gate;
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub memory_capacity: Size,
    pub time_slice: Duration,
}

impl RuntimeConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            memory_capacity: DEFAULT_MEMORY_POOL,
            time_slice: DEFAULT_TIME_SLICE,
        }
    }

    #[must_use]
    pub fn with_memory_capacity(mut self, capacity: Size) -> Self {
        self.memory_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_time_slice(mut self, slice: Duration) -> Self {
        self.time_slice = slice;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Combined runtime statistics snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RuntimeStats {
    pub memory: MemoryStats,
    pub scheduler: SchedulerStats,
}

/// Single-address-space runtime for cooperative hosts
pub struct Runtime {
    allocator: BlockAllocator,
    scheduler: Scheduler,
    io: StreamIo,
    gate: Option<Arc<dyn Gate>>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        info!(
            "runtime starting: {} byte pool, {:?} time slice",
            config.memory_capacity, config.time_slice
        );
        Self {
            allocator: BlockAllocator::with_capacity(config.memory_capacity),
            scheduler: Scheduler::with_time_slice(config.time_slice),
            io: StreamIo::new(),
            gate: None,
        }
    }

    /// Install an advisory verification gate.
    ///
    /// Verdicts are logged but never alter runtime state.
    #[must_use]
    pub fn with_gate(mut self, gate: Arc<dyn Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn allocator(&self) -> &BlockAllocator {
        &self.allocator
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn io(&self) -> &StreamIo {
        &self.io
    }

    /// Admit a process to the scheduler
    pub fn spawn<R: Runnable + 'static>(&self, body: R) -> Pid {
        self.scheduler.spawn(body)
    }

    /// Allocate through the tracked allocator, consulting the gate
    pub fn allocate(&self, size: Size) -> MemoryResult<Handle> {
        let handle = self.allocator.allocate(size)?;
        if let Some(gate) = &self.gate {
            if !gate.memory_safety(handle, size) {
                warn!(
                    "advisory memory safety check failed for handle {:#x} ({} bytes)",
                    handle, size
                );
            }
        }
        Ok(handle)
    }

    /// Release a tracked allocation
    pub fn free(&self, handle: Handle) -> MemoryResult<Size> {
        self.allocator.free(handle)
    }

    /// Advance scheduler time by `elapsed`
    pub fn tick(&self, elapsed: Duration) -> Option<Pid> {
        self.scheduler.tick(elapsed)
    }

    /// Run one full pass over the ready work: every record that is ready
    /// (or current) when the pass starts executes exactly once, in
    /// scheduling order. Returns the number of bodies executed.
    pub fn run_ready(&self) -> usize {
        let stats = self.scheduler.stats();
        let budget = stats.ready_count + usize::from(self.scheduler.current().is_some());

        let mut executed = 0;
        for _ in 0..budget {
            if self.scheduler.schedule_next().is_none() {
                break;
            }
            if self.scheduler.run_current().is_ok() {
                executed += 1;
            }
        }
        executed
    }

    /// Snapshot of memory and scheduler statistics
    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            memory: self.allocator.stats(),
            scheduler: self.scheduler.stats(),
        }
    }

    /// Tear down explicitly: release every live allocation.
    ///
    /// Dropping the runtime has the same effect; this is for hosts that
    /// want the released byte count.
    pub fn shutdown(&self) -> Size {
        let freed = self.allocator.free_all();
        info!("runtime shut down, {} bytes released", freed);
        freed
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
