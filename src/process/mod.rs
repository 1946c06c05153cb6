/*!
 * Process Module
 * Process records and lifecycle states
 */

mod task;
mod types;

pub use task::{Process, Runnable};
pub use types::ProcessState;
