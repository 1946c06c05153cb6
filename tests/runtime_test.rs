/*!
 * Runtime Façade Tests
 * Wiring, scheduling passes, gate observability, and teardown
 */

use pretty_assertions::assert_eq;
use runlet::{Gate, Handle, MemoryError, Runtime, RuntimeConfig, Size};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Gate that rejects everything and counts how often it was consulted
struct RejectingGate {
    consulted: AtomicUsize,
}

impl Gate for RejectingGate {
    fn memory_safety(&self, _handle: Handle, _size: Size) -> bool {
        self.consulted.fetch_add(1, Ordering::SeqCst);
        false
    }

    fn type_safety(&self, _handle: Handle, _size: Size) -> bool {
        false
    }

    fn thread_safety(&self, _handle: Handle, _size: Size) -> bool {
        false
    }
}

#[test]
fn test_runtime_defaults() {
    let runtime = Runtime::new();
    let stats = runtime.stats();

    assert_eq!(stats.memory.used_memory, 0);
    assert_eq!(stats.scheduler.total_count, 0);
}

#[test]
fn test_config_builder() {
    let runtime = Runtime::with_config(
        RuntimeConfig::new()
            .with_memory_capacity(2048)
            .with_time_slice(Duration::from_millis(25)),
    );

    assert_eq!(runtime.stats().memory.total_memory, 2048);
    assert_eq!(runtime.scheduler().time_slice(), Duration::from_millis(25));
}

#[test]
fn test_run_ready_executes_each_once() {
    let runtime = Runtime::new();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let counter = Arc::clone(&counter);
        runtime.spawn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert_eq!(runtime.run_ready(), 3);
    assert_eq!(counter.load(Ordering::SeqCst), 3);

    // Records stay reusable; a second pass runs them again
    assert_eq!(runtime.run_ready(), 3);
    assert_eq!(counter.load(Ordering::SeqCst), 6);
}

#[test]
fn test_run_ready_executes_in_admission_order() {
    let runtime = Runtime::new();
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

    for tag in ["a", "b", "c"] {
        let order = Arc::clone(&order);
        runtime.spawn(move || {
            order.lock().push(tag);
        });
    }

    runtime.run_ready();
    assert_eq!(*order.lock(), vec!["a", "b", "c"]);
}

#[test]
fn test_gate_verdict_never_alters_state() {
    let gate = Arc::new(RejectingGate {
        consulted: AtomicUsize::new(0),
    });
    let runtime = Runtime::with_config(RuntimeConfig::new().with_memory_capacity(1024))
        .with_gate(gate.clone());

    // The gate rejects, the allocation still succeeds untouched
    let handle = runtime.allocate(512).unwrap();
    assert_eq!(gate.consulted.load(Ordering::SeqCst), 1);
    assert!(runtime.allocator().is_valid(handle));
    assert_eq!(runtime.stats().memory.used_memory, 512);

    assert_eq!(runtime.free(handle), Ok(512));
}

#[test]
fn test_allocation_errors_pass_through() {
    let runtime = Runtime::with_config(RuntimeConfig::new().with_memory_capacity(100));

    runtime.allocate(80).unwrap();
    assert!(matches!(
        runtime.allocate(40),
        Err(MemoryError::CapacityExceeded { .. })
    ));
}

#[test]
fn test_tick_drives_rotation() {
    let runtime = Runtime::with_config(
        RuntimeConfig::new().with_time_slice(Duration::from_millis(10)),
    );

    let a = runtime.spawn(|| {});
    let b = runtime.spawn(|| {});

    assert_eq!(runtime.tick(Duration::ZERO), Some(a));
    assert_eq!(runtime.tick(Duration::from_millis(15)), Some(b));
}

#[test]
fn test_shutdown_releases_everything() {
    let runtime = Runtime::with_config(RuntimeConfig::new().with_memory_capacity(4096));

    runtime.allocate(1000).unwrap();
    runtime.allocate(500).unwrap();

    assert_eq!(runtime.shutdown(), 1500);
    assert_eq!(runtime.stats().memory.used_memory, 0);
}

#[test]
fn test_stats_serialize() {
    let runtime = Runtime::new();
    runtime.spawn(|| {});
    runtime.allocate(64).unwrap();

    let rendered = serde_json::to_string(&runtime.stats()).unwrap();
    assert!(rendered.contains("used_memory"));
    assert!(rendered.contains("ready_count"));
}
