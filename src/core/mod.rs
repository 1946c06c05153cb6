/*!
 * Core Module
 * Shared types, errors, and limits
 */

pub mod errors;
pub mod limits;
pub mod types;

pub use errors::RuntimeError;
pub use types::{Handle, Pid, Priority, RuntimeResult, Size};
