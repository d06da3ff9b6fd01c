/// Concurrency tests for the counter store
///
/// Covers:
/// - No lost updates when many threads bump the same label
/// - Scrapes taken mid-update only ever see whole, monotonic values
use grpc_metrics::MetricsRegistry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

const THREADS: usize = 16;
const PER_THREAD: usize = 500;

#[test]
fn test_concurrent_increments_are_not_lost() {
    let registry = MetricsRegistry::new();
    let counter = registry
        .register_counter("concurrent_calls_total", "Concurrent calls", "name")
        .unwrap();

    thread::scope(|scope| {
        for _ in 0..THREADS {
            let counter = counter.clone();
            scope.spawn(move || {
                for _ in 0..PER_THREAD {
                    counter.increment("L");
                }
            });
        }
    });

    let snapshot = counter.snapshot();
    assert_eq!(snapshot.get("L"), Some((THREADS * PER_THREAD) as u64));
    assert_eq!(snapshot.len(), 1);
}

#[test]
fn test_interleaved_labels_stay_independent() {
    let registry = MetricsRegistry::new();
    let counter = registry
        .register_counter("interleaved_calls_total", "Interleaved calls", "name")
        .unwrap();

    thread::scope(|scope| {
        for i in 0..THREADS {
            let counter = counter.clone();
            scope.spawn(move || {
                let label = if i % 2 == 0 { "A" } else { "B" };
                for _ in 0..PER_THREAD {
                    counter.increment(label);
                }
            });
        }
    });

    let expected = (THREADS / 2 * PER_THREAD) as u64;
    let snapshot = counter.snapshot();
    assert_eq!(snapshot.get("A"), Some(expected));
    assert_eq!(snapshot.get("B"), Some(expected));
}

#[test]
fn test_snapshot_while_incrementing() {
    let registry = MetricsRegistry::new();
    let counter = registry
        .register_counter("scraped_calls_total", "Scraped calls", "name")
        .unwrap();
    let total = (THREADS * PER_THREAD) as u64;
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        let writers: Vec<_> = (0..THREADS)
            .map(|i| {
                let counter = counter.clone();
                scope.spawn(move || {
                    for j in 0..PER_THREAD {
                        counter.increment("L");
                        // Fresh labels force inserts under the write lock
                        if j % 100 == 0 {
                            counter.increment(&format!("fresh-{i}-{j}"));
                        }
                    }
                })
            })
            .collect();

        let reader = scope.spawn(|| {
            let mut last = 0;
            let mut scrapes = 0;
            loop {
                let finished = done.load(Ordering::Acquire);
                let snapshot = counter.snapshot();
                if let Some(value) = snapshot.get("L") {
                    assert!(value >= last, "counter went backwards: {value} < {last}");
                    assert!(value <= total, "counter overshot: {value} > {total}");
                    last = value;
                }
                for (label, value) in snapshot.iter() {
                    if label.starts_with("fresh-") {
                        assert_eq!(*value, 1);
                    }
                }
                scrapes += 1;
                if finished {
                    break;
                }
            }
            scrapes
        });

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Release);
        assert!(reader.join().unwrap() > 0);
    });

    let snapshot = counter.snapshot();
    assert_eq!(snapshot.get("L"), Some(total));
    assert_eq!(snapshot.len(), 1 + THREADS * (PER_THREAD / 100));
}
