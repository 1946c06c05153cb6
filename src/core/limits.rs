/*!
 * Runtime Limits and Constants
 *
 * Centralized location for runtime-wide limits, thresholds, and defaults.
 * All values include rationale comments explaining WHY they exist.
 */

use super::types::{Handle, Pid, Priority};
use std::time::Duration;

/// Default allocator pool capacity (64MB)
/// Sized for embedded-style hosts; callers override via `with_capacity`
pub const DEFAULT_MEMORY_POOL: usize = 64 * 1024 * 1024;

/// Default scheduler time slice (100ms)
/// Coarse rotation interval for cooperative hosts polling `tick`
pub const DEFAULT_TIME_SLICE: Duration = Duration::from_millis(100);

/// Default process priority
/// Carried on every record; selection is strictly FIFO for now
pub const DEFAULT_PRIORITY: Priority = 0;

/// First pid handed out by a fresh scheduler
/// Zero is reserved so hosts can treat it as "no process"
pub const INITIAL_PID: Pid = 1;

/// First allocation handle handed out by a fresh allocator
/// Zero is reserved so advisory gates can treat it as a null handle
pub const INITIAL_HANDLE: Handle = 1;

/// Memory pressure warning threshold (80% of capacity)
pub const PRESSURE_WARNING: f64 = 0.80;

/// Memory pressure critical threshold (95% of capacity)
pub const PRESSURE_CRITICAL: f64 = 0.95;

/// Convert bytes to megabytes for human-readable output
#[inline]
pub const fn bytes_to_mb(bytes: usize) -> usize {
    bytes / (1024 * 1024)
}

/// Convert megabytes to bytes
#[inline]
pub const fn mb_to_bytes(mb: usize) -> usize {
    mb * 1024 * 1024
}
