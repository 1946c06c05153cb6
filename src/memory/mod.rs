/*!
 * Memory Management
 *
 * Capacity-bounded block allocator that tracks every live allocation.
 *
 * The total budget is fixed at creation and `used` can never exceed it:
 * the budget is reserved before the host allocation is attempted, so a
 * request that would blow the cap is rejected without ever touching the
 * host allocator. Each grant is recorded in an owned handle-to-record
 * map, giving O(1) release by handle identity.
 */

mod allocator;
mod types;

pub mod traits;

pub use traits::{Allocator, MemoryInfo};
pub use types::{AllocationRecord, MemoryError, MemoryPressure, MemoryResult, MemoryStats};

use crate::core::limits::{
    DEFAULT_MEMORY_POOL, INITIAL_HANDLE, PRESSURE_CRITICAL, PRESSURE_WARNING,
};
use crate::core::types::{Handle, Size};
use ahash::RandomState;
use dashmap::DashMap;
use log::info;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Capacity-bounded block allocator
pub struct BlockAllocator {
    pub(super) records: Arc<DashMap<Handle, AllocationRecord, RandomState>>,
    pub(super) next_handle: Arc<AtomicU64>,
    pub(super) capacity: Size,
    pub(super) used: Arc<AtomicUsize>,
    // Memory pressure thresholds (ratio of capacity)
    pub(super) warning_threshold: f64,
    pub(super) critical_threshold: f64,
    pub(super) last_error: Arc<RwLock<Option<MemoryError>>>,
}

impl BlockAllocator {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_POOL)
    }

    /// Create an allocator with a custom capacity. Zero is permitted and
    /// produces an allocator that rejects every non-empty request.
    pub fn with_capacity(capacity: Size) -> Self {
        info!("block allocator initialized with {} byte budget", capacity);
        Self {
            records: Arc::new(DashMap::with_hasher(RandomState::new())),
            next_handle: Arc::new(AtomicU64::new(INITIAL_HANDLE)),
            capacity,
            used: Arc::new(AtomicUsize::new(0)),
            warning_threshold: PRESSURE_WARNING,
            critical_threshold: PRESSURE_CRITICAL,
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Get memory info as (total, used, available)
    pub fn info(&self) -> (Size, Size, Size) {
        let used = self.used.load(Ordering::SeqCst);
        (self.capacity, used, self.capacity - used)
    }

    /// Get overall memory statistics
    pub fn stats(&self) -> MemoryStats {
        let used = self.used.load(Ordering::SeqCst);
        MemoryStats {
            total_memory: self.capacity,
            used_memory: used,
            available_memory: self.capacity - used,
            usage_percentage: if self.capacity == 0 {
                0.0
            } else {
                (used as f64 / self.capacity as f64) * 100.0
            },
            allocated_blocks: self.records.len(),
        }
    }
}

impl Allocator for BlockAllocator {
    fn allocate(&self, size: Size) -> MemoryResult<Handle> {
        BlockAllocator::allocate(self, size)
    }

    fn free(&self, handle: Handle) -> MemoryResult<Size> {
        BlockAllocator::free(self, handle)
    }

    fn is_valid(&self, handle: Handle) -> bool {
        BlockAllocator::is_valid(self, handle)
    }

    fn block_size(&self, handle: Handle) -> Option<Size> {
        BlockAllocator::block_size(self, handle)
    }
}

impl MemoryInfo for BlockAllocator {
    fn stats(&self) -> MemoryStats {
        BlockAllocator::stats(self)
    }

    fn info(&self) -> (Size, Size, Size) {
        BlockAllocator::info(self)
    }
}

impl Clone for BlockAllocator {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            next_handle: Arc::clone(&self.next_handle),
            capacity: self.capacity,
            used: Arc::clone(&self.used),
            warning_threshold: self.warning_threshold,
            critical_threshold: self.critical_threshold,
            last_error: Arc::clone(&self.last_error),
        }
    }
}

impl Default for BlockAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        let alloc = BlockAllocator::with_capacity(1024);
        assert_eq!(alloc.allocate(0), Err(MemoryError::InvalidSize(0)));
        assert_eq!(alloc.last_error(), Some(MemoryError::InvalidSize(0)));

        let (_, used, _) = alloc.info();
        assert_eq!(used, 0);
    }

    #[test]
    fn test_budget_reserved_before_host_allocation() {
        let alloc = BlockAllocator::with_capacity(100);

        let handle = alloc.allocate(60).unwrap();
        assert!(alloc.is_valid(handle));
        assert_eq!(alloc.block_size(handle), Some(60));

        // Over budget: rejected without touching the host allocator
        let err = alloc.allocate(50).unwrap_err();
        assert_eq!(
            err,
            MemoryError::CapacityExceeded {
                requested: 50,
                available: 40,
                used: 60,
                total: 100,
            }
        );
        let (_, used, _) = alloc.info();
        assert_eq!(used, 60);
    }

    #[test]
    fn test_double_free_rejected() {
        let alloc = BlockAllocator::with_capacity(1024);
        let handle = alloc.allocate(128).unwrap();

        assert_eq!(alloc.free(handle), Ok(128));
        assert_eq!(alloc.free(handle), Err(MemoryError::NotFound(handle)));

        let (_, used, _) = alloc.info();
        assert_eq!(used, 0);
    }

    #[test]
    fn test_zero_capacity_allocator() {
        let alloc = BlockAllocator::with_capacity(0);
        assert!(matches!(
            alloc.allocate(1),
            Err(MemoryError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_free_all_releases_everything() {
        let alloc = BlockAllocator::with_capacity(1024);
        alloc.allocate(100).unwrap();
        alloc.allocate(200).unwrap();
        alloc.allocate(300).unwrap();

        assert_eq!(alloc.free_all(), 600);
        let (_, used, _) = alloc.info();
        assert_eq!(used, 0);
        assert_eq!(alloc.stats().allocated_blocks, 0);
    }

    #[test]
    fn test_pressure_levels() {
        let alloc = BlockAllocator::with_capacity(100);
        alloc.allocate(96).unwrap();
        assert_eq!(alloc.stats().pressure(), MemoryPressure::Critical);
    }
}
