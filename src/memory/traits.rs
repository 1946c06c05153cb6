/*!
 * Memory Traits
 * Block allocator abstractions
 */

use super::types::*;
use crate::core::types::{Handle, Size};

/// Capacity-bounded allocator interface
pub trait Allocator: Send + Sync {
    /// Allocate a tracked block of `size` bytes
    fn allocate(&self, size: Size) -> MemoryResult<Handle>;

    /// Release the block identified by `handle`, returning its size
    fn free(&self, handle: Handle) -> MemoryResult<Size>;

    /// Check if a handle refers to a live allocation
    fn is_valid(&self, handle: Handle) -> bool;

    /// Get the size of a live allocation
    fn block_size(&self, handle: Handle) -> Option<Size>;
}

/// Memory statistics provider
pub trait MemoryInfo: Send + Sync {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Get memory info as (total, used, available)
    fn info(&self) -> (Size, Size, Size);

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().pressure()
    }
}
