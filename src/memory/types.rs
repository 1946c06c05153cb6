/*!
 * Memory Types
 * Common types for the block allocator
 */

use crate::core::limits::{PRESSURE_CRITICAL, PRESSURE_WARNING};
use crate::core::types::{Handle, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("invalid allocation size: {0} bytes")]
    InvalidSize(usize),

    #[error("capacity exceeded: requested {requested} bytes, available {available} bytes ({used} used / {total} total)")]
    CapacityExceeded {
        requested: usize,
        available: usize,
        used: usize,
        total: usize,
    },

    #[error("host allocator could not satisfy request for {requested} bytes")]
    OutOfMemory { requested: usize },

    #[error("no live allocation for handle {0:#x}")]
    NotFound(Handle),
}

/// Bookkeeping entry pairing a live handle with its granted bytes.
///
/// The backing storage is owned here, so dropping the record (or the
/// allocator holding it) releases the memory.
#[derive(Debug)]
pub struct AllocationRecord {
    pub handle: Handle,
    pub size: Size,
    #[allow(dead_code)]
    backing: Vec<u8>,
}

impl AllocationRecord {
    pub(crate) fn new(handle: Handle, size: Size, backing: Vec<u8>) -> Self {
        Self {
            handle,
            size,
            backing,
        }
    }
}

/// Memory statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemoryStats {
    pub total_memory: usize,
    pub used_memory: usize,
    pub available_memory: usize,
    pub usage_percentage: f64,
    pub allocated_blocks: usize,
}

impl MemoryStats {
    pub fn pressure(&self) -> MemoryPressure {
        if self.usage_percentage >= PRESSURE_CRITICAL * 100.0 {
            MemoryPressure::Critical
        } else if self.usage_percentage >= PRESSURE_WARNING * 100.0 {
            MemoryPressure::High
        } else if self.usage_percentage >= 60.0 {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
