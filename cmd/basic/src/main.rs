//! Basic traffic light example
//!
//! Starts one light, prints its phase while waiting for green a few times,
//! then shuts it down.
//!
//! # Environment Variables
//!
//! - `TL_LOG_LEVEL=debug` - Show every phase change (off, error, warn, info, debug, trace)
//! - `TL_CYCLE_MIN_MS` / `TL_CYCLE_MAX_MS` - Phase duration window (default 4000/6000)
//! - `TL_LOG_TIME=1` - Prefix log lines with elapsed milliseconds

use std::time::Instant;

use tlight::{kinfo, LightResult, TrafficLight};

// TL_LOG_LEVEL=debug TL_CYCLE_MIN_MS=400 TL_CYCLE_MAX_MS=600 cargo run -p tlight-basic -- 3
fn main() -> LightResult<()> {
    println!("=== Traffic Light Basic Example ===\n");

    let greens: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3);

    let light = TrafficLight::new();
    println!("Initial phase: {}", light.current_phase());

    light.simulate()?;
    let start = Instant::now();

    for i in 1..=greens {
        println!("Waiting for green #{} (now {})...", i, light.current_phase());
        light.wait_for_green();
        kinfo!("green #{} after {:?}", i, start.elapsed());
        println!("Green #{} at {:?}", i, start.elapsed());
    }

    if let Some(stats) = light.shutdown() {
        println!(
            "\nTransitions: {} (go {}, stop {}), waited {:?}",
            stats.transitions, stats.go_count, stats.stop_count, stats.total_wait
        );
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
