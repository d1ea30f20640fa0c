//! Light configuration
//!
//! Compiled-in defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Builder setters
//! 2. Environment variables
//! 3. Library defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use tlight::LightConfig;
//!
//! // Defaults with env overrides
//! let config = LightConfig::from_env();
//!
//! // Fast cycling for a demo
//! let config = LightConfig::from_env()
//!     .cycle_window(Duration::from_millis(400), Duration::from_millis(600));
//! ```

use std::time::Duration;

use tlight_core::env::{env_get_duration_ms, env_get_str};
use tlight_core::{LightError, LightResult};

/// Library defaults
pub mod defaults {
    /// Shortest phase duration
    pub const CYCLE_MIN_MS: u64 = 4000;
    /// Longest phase duration
    pub const CYCLE_MAX_MS: u64 = 6000;
    /// Pause after publishing a transition
    pub const YIELD_MS: u64 = 1;
    /// How often cancellable waits re-check their token
    pub const POLL_MS: u64 = 10;
    /// Name of the cycling thread
    pub const THREAD_NAME: &str = "tlight-cycle";
}

/// Light configuration with builder pattern.
#[derive(Debug, Clone)]
pub struct LightConfig {
    /// Lower bound of the per-phase duration (inclusive)
    pub cycle_min: Duration,
    /// Upper bound of the per-phase duration (inclusive)
    pub cycle_max: Duration,
    /// Sleep after each published transition
    pub yield_interval: Duration,
    /// Token check interval for `wait_for_green_cancellable`
    pub poll_interval: Duration,
    /// Cycling thread name
    pub thread_name: String,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl LightConfig {
    /// Library defaults, ignoring the environment
    pub fn builtin() -> Self {
        Self {
            cycle_min: Duration::from_millis(defaults::CYCLE_MIN_MS),
            cycle_max: Duration::from_millis(defaults::CYCLE_MAX_MS),
            yield_interval: Duration::from_millis(defaults::YIELD_MS),
            poll_interval: Duration::from_millis(defaults::POLL_MS),
            thread_name: defaults::THREAD_NAME.to_string(),
        }
    }

    /// Library defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `TL_CYCLE_MIN_MS` - Shortest phase duration in milliseconds
    /// - `TL_CYCLE_MAX_MS` - Longest phase duration in milliseconds
    /// - `TL_YIELD_MS` - Pause after each transition in milliseconds
    /// - `TL_POLL_MS` - Cancellation check interval in milliseconds
    /// - `TL_THREAD_NAME` - Cycling thread name
    pub fn from_env() -> Self {
        let builtin = Self::builtin();
        Self {
            cycle_min: env_get_duration_ms("TL_CYCLE_MIN_MS", builtin.cycle_min),
            cycle_max: env_get_duration_ms("TL_CYCLE_MAX_MS", builtin.cycle_max),
            yield_interval: env_get_duration_ms("TL_YIELD_MS", builtin.yield_interval),
            poll_interval: env_get_duration_ms("TL_POLL_MS", builtin.poll_interval),
            thread_name: env_get_str("TL_THREAD_NAME", &builtin.thread_name),
        }
    }

    /// Set both bounds of the phase duration window
    pub fn cycle_window(mut self, min: Duration, max: Duration) -> Self {
        self.cycle_min = min;
        self.cycle_max = max;
        self
    }

    /// Set pause after each transition
    pub fn yield_interval(mut self, d: Duration) -> Self {
        self.yield_interval = d;
        self
    }

    /// Set cancellation poll interval
    pub fn poll_interval(mut self, d: Duration) -> Self {
        self.poll_interval = d;
        self
    }

    /// Set cycling thread name
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> LightResult<()> {
        if self.cycle_max.is_zero() {
            return Err(LightError::InvalidConfig("cycle_max must be non-zero"));
        }
        if self.cycle_min > self.cycle_max {
            return Err(LightError::InvalidConfig("cycle_min exceeds cycle_max"));
        }
        if self.poll_interval.is_zero() {
            return Err(LightError::InvalidConfig("poll_interval must be non-zero"));
        }
        // OS thread names are C strings
        if self.thread_name.contains('\0') {
            return Err(LightError::InvalidConfig("thread_name contains a null byte"));
        }
        Ok(())
    }
}
