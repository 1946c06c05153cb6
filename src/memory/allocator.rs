/*!
 * Block Allocator Implementation
 * Allocation and release logic
 */

use super::types::{AllocationRecord, MemoryError, MemoryPressure, MemoryResult};
use super::BlockAllocator;
use crate::core::types::{Handle, Size};
use log::{info, warn};
use std::sync::atomic::Ordering;

impl BlockAllocator {
    /// Allocate a tracked block of `size` bytes.
    ///
    /// The capacity check happens BEFORE the host allocation is attempted,
    /// so `used` never exceeds the configured total, not even transiently.
    pub fn allocate(&self, size: Size) -> MemoryResult<Handle> {
        if size == 0 {
            return Err(self.fail(MemoryError::InvalidSize(size)));
        }

        // Reserve budget first. CAS loop so concurrent callers can never
        // push `used` past `capacity`.
        let mut used = self.used.load(Ordering::SeqCst);
        loop {
            let requested_total = used.checked_add(size);
            let over_budget = match requested_total {
                Some(total) => total > self.capacity,
                None => true,
            };
            if over_budget {
                return Err(self.fail(MemoryError::CapacityExceeded {
                    requested: size,
                    available: self.capacity - used,
                    used,
                    total: self.capacity,
                }));
            }
            match self.used.compare_exchange(
                used,
                used + size,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => break,
                Err(current) => used = current,
            }
        }

        // Budget is reserved; now ask the host allocator for the bytes.
        let mut backing = Vec::new();
        if backing.try_reserve_exact(size).is_err() {
            self.used.fetch_sub(size, Ordering::SeqCst);
            return Err(self.fail(MemoryError::OutOfMemory { requested: size }));
        }
        backing.resize(size, 0);

        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.records
            .insert(handle, AllocationRecord::new(handle, size, backing));
        self.clear_error();

        let used_now = used + size;
        if let Some(level) = self.check_pressure(used_now) {
            warn!(
                "memory pressure {}: allocated {} bytes as handle {:#x} ({:.1}% used: {} / {})",
                level,
                size,
                handle,
                (used_now as f64 / self.capacity as f64) * 100.0,
                used_now,
                self.capacity
            );
        } else {
            info!("allocated {} bytes as handle {:#x}", size, handle);
        }

        Ok(handle)
    }

    /// Release the block identified by `handle`, returning its size.
    ///
    /// An unknown or already-freed handle is rejected with `NotFound` and
    /// leaves the allocator untouched, so a double free is always safe.
    pub fn free(&self, handle: Handle) -> MemoryResult<Size> {
        match self.records.remove(&handle) {
            Some((_, record)) => {
                self.used.fetch_sub(record.size, Ordering::SeqCst);
                self.clear_error();
                info!("freed {} bytes at handle {:#x}", record.size, handle);
                Ok(record.size)
            }
            None => {
                warn!("attempted to free unknown or already freed handle {:#x}", handle);
                Err(self.fail(MemoryError::NotFound(handle)))
            }
        }
    }

    /// Release every remaining live allocation, returning the bytes freed.
    ///
    /// Dropping the allocator releases everything as well; this exists for
    /// hosts that want an explicit, observable teardown.
    pub fn free_all(&self) -> Size {
        let handles: Vec<Handle> = self.records.iter().map(|entry| *entry.key()).collect();
        let mut freed = 0;
        for handle in handles {
            if let Some((_, record)) = self.records.remove(&handle) {
                self.used.fetch_sub(record.size, Ordering::SeqCst);
                freed += record.size;
            }
        }
        if freed > 0 {
            info!("released {} bytes across all live allocations", freed);
        }
        freed
    }

    /// Check if a handle refers to a live allocation
    pub fn is_valid(&self, handle: Handle) -> bool {
        self.records.contains_key(&handle)
    }

    /// Get the size of a live allocation
    pub fn block_size(&self, handle: Handle) -> Option<Size> {
        self.records.get(&handle).map(|entry| entry.size)
    }

    /// Last failed operation, if the most recent call failed.
    ///
    /// Convenience for polling-style hosts; every call also reports its
    /// outcome directly through its return value.
    pub fn last_error(&self) -> Option<MemoryError> {
        self.last_error.read().clone()
    }

    pub(super) fn check_pressure(&self, used: Size) -> Option<MemoryPressure> {
        if self.capacity == 0 {
            return None;
        }
        let usage_ratio = used as f64 / self.capacity as f64;

        if usage_ratio >= self.critical_threshold {
            Some(MemoryPressure::Critical)
        } else if usage_ratio >= self.warning_threshold {
            Some(MemoryPressure::High)
        } else if usage_ratio >= 0.60 {
            Some(MemoryPressure::Medium)
        } else {
            None
        }
    }

    fn fail(&self, err: MemoryError) -> MemoryError {
        *self.last_error.write() = Some(err.clone());
        err
    }

    fn clear_error(&self) {
        *self.last_error.write() = None;
    }
}
