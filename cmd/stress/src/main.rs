//! Stress test - many waiters on one light
//!
//! Spawns N threads that each call `wait_for_green()` against the same
//! light. Phase messages are consumed competitively, so each waiter needs
//! its own go message; the test reports how long the last one took.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tlight::{kdebug, LightConfig, LightResult, TrafficLight};

fn main() -> LightResult<()> {
    println!("=== Traffic Light Stress Test ===\n");

    let num_waiters: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);

    let config = LightConfig::from_env()
        .cycle_window(Duration::from_millis(2), Duration::from_millis(6))
        .yield_interval(Duration::from_millis(1));
    let light = Arc::new(TrafficLight::with_config(config)?);
    light.simulate()?;

    println!("Spawning {} waiters...", num_waiters);
    let completed = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    let handles: Vec<_> = (0..num_waiters)
        .map(|i| {
            let light = Arc::clone(&light);
            let completed = Arc::clone(&completed);
            thread::Builder::new()
                .name(format!("waiter-{}", i))
                .spawn(move || {
                    light.wait_for_green();
                    kdebug!("waiter {} saw green", i);
                    completed.fetch_add(1, Ordering::SeqCst);
                })
        })
        .collect::<Result<_, _>>()
        .map_err(|_| tlight::LightError::SpawnFailed)?;

    for handle in handles {
        if handle.join().is_err() {
            println!("WARNING: waiter panicked");
        }
    }

    let elapsed = start.elapsed();
    println!(
        "{}/{} waiters returned in {:?}",
        completed.load(Ordering::SeqCst),
        num_waiters,
        elapsed
    );

    if let Some(stats) = light.shutdown() {
        println!("Transitions: {} ({} go)", stats.transitions, stats.go_count);
    }

    println!("\n=== Stress Test Complete ===");
    Ok(())
}
