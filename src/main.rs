/*!
 * Runlet - Demo Host
 *
 * Small host program that wires the runtime together:
 * - spawns a few cooperative processes
 * - drives scheduling with tick polls
 * - exercises the tracked allocator
 * - prints a stats snapshot as JSON
 */

use log::info;
use runlet::{HeuristicGate, Runtime, RuntimeConfig, RuntimeError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn main() -> miette::Result<()> {
    env_logger::init();

    info!("runlet demo host starting");

    let runtime = Runtime::with_config(
        RuntimeConfig::new()
            .with_memory_capacity(16 * 1024 * 1024)
            .with_time_slice(Duration::from_millis(50)),
    )
    .with_gate(Arc::new(HeuristicGate));

    // A few cooperative workers sharing a counter
    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..3 {
        let counter = Arc::clone(&counter);
        runtime.spawn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }

    // Two scheduling passes with tick polls in between
    let ran = runtime.run_ready();
    info!("first pass executed {} processes", ran);
    runtime.tick(Duration::from_millis(60));
    let ran = runtime.run_ready();
    info!("second pass executed {} processes", ran);
    info!("worker counter at {}", counter.load(Ordering::SeqCst));

    // Tracked allocations under the configured budget
    let first = runtime.allocate(4096).map_err(RuntimeError::from)?;
    let second = runtime.allocate(8192).map_err(RuntimeError::from)?;
    runtime.free(first).map_err(RuntimeError::from)?;
    info!("live block: {:?} bytes", runtime.allocator().block_size(second));

    let stats = runtime.stats();
    let rendered = serde_json::to_string_pretty(&stats)
        .expect("stats snapshot serializes");
    println!("{rendered}");

    let freed = runtime.shutdown();
    info!("released {} bytes at shutdown", freed);

    Ok(())
}
