//! # tlight - a traffic light on its own thread
//!
//! One light, one background thread, one blocking queue. The light starts
//! at `Stop`, flips phase after a random 4-6 second delay, and publishes
//! each new phase into a FIFO queue that observers drain.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tlight::{Phase, TrafficLight};
//!
//! fn main() -> tlight::LightResult<()> {
//!     let light = Arc::new(TrafficLight::new());
//!     light.simulate()?;
//!
//!     // Poll a snapshot...
//!     println!("now: {}", light.current_phase());
//!
//!     // ...or block until the next change to go
//!     light.wait_for_green();
//!     assert_eq!(light.current_phase(), Phase::Go);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐        ┌──────────────────────────┐
//! │     cycling thread       │ send   │   BlockingQueue<Phase>   │
//! │ sleep → toggle → publish ├───────►│    Mutex<VecDeque>       │
//! └────────────┬─────────────┘        │    + Condvar             │
//!              │ write                └────────────┬─────────────┘
//!              ▼                                   │ receive
//!     ┌─────────────────┐                          ▼
//!     │  Mutex<Phase>   │◄── current_phase()   wait_for_green()
//!     └─────────────────┘         (any thread)    (any thread)
//! ```

pub mod phase;
pub mod config;
pub mod light;

pub use phase::Phase;
pub use config::LightConfig;
pub use light::{CycleStats, TrafficLight};

// Re-export core types
pub use tlight_core::{BlockingQueue, CancellationToken, LightError, LightResult, StopSignal};

// Re-export kprint macros for logging
pub use tlight_core::{kerror, kwarn, kinfo, kdebug};
pub use tlight_core::kprint::{
    init as init_logging, set_flush_enabled, set_log_level, set_time_enabled, LogLevel,
};

// Re-export env utilities
pub use tlight_core::{env_get, env_get_bool, env_get_duration_ms, env_get_opt, env_get_str};
