/*!
 * Core Types
 * Common types used across the runtime
 */

/// Process ID type
pub type Pid = u32;

/// Opaque handle identifying a live allocation
pub type Handle = u64;

/// Size type for memory operations
pub type Size = usize;

/// Priority level (0-255, higher is more important)
pub type Priority = u8;

/// Common result type for runtime operations
pub type RuntimeResult<T> = Result<T, super::errors::RuntimeError>;
