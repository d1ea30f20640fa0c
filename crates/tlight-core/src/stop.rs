//! Wakeable sleep for background loops
//!
//! A background thread sleeps through `StopSignal::sleep` instead of
//! `std::thread::sleep`, so that `stop()` can end the sleep early.
//! Once stopped, the signal stays stopped.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Condvar-based stop flag with timed sleep
pub struct StopSignal {
    /// Set once by `stop()`
    stopped: Mutex<bool>,

    /// Wakes sleepers on stop
    condvar: Condvar,
}

impl StopSignal {
    /// Create a signal in the running state
    pub fn new() -> Self {
        Self {
            stopped: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Sleep for `duration` unless stopped first
    ///
    /// Returns:
    /// - `true` if the signal was (or became) stopped
    /// - `false` if the full duration elapsed
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = match Instant::now().checked_add(duration) {
            Some(deadline) => deadline,
            None => {
                self.wait();
                return true;
            }
        };

        let mut stopped = self.stopped.lock();
        while !*stopped {
            if self.condvar.wait_until(&mut stopped, deadline).timed_out() {
                return *stopped;
            }
        }
        true
    }

    /// Block until stopped
    pub fn wait(&self) {
        let mut stopped = self.stopped.lock();
        while !*stopped {
            self.condvar.wait(&mut stopped);
        }
    }

    /// Stop and wake every sleeper
    pub fn stop(&self) {
        {
            let mut stopped = self.stopped.lock();
            *stopped = true;
        }
        self.condvar.notify_all();
    }

    /// Check if `stop()` has been called
    pub fn is_stopped(&self) -> bool {
        *self.stopped.lock()
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSignal")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sleep_full_duration() {
        let signal = StopSignal::new();
        let start = Instant::now();

        assert!(!signal.sleep(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(40)); // Allow some slack
    }

    #[test]
    fn test_stop_wakes_sleeper() {
        let signal = Arc::new(StopSignal::new());
        let signal2 = Arc::clone(&signal);

        let handle = thread::spawn(move || {
            let start = Instant::now();
            let stopped = signal2.sleep(Duration::from_secs(10));
            (stopped, start.elapsed())
        });

        thread::sleep(Duration::from_millis(50));
        signal.stop();

        let (stopped, elapsed) = handle.join().unwrap();
        assert!(stopped);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_sleep_after_stop_returns_immediately() {
        let signal = StopSignal::new();
        signal.stop();

        let start = Instant::now();
        assert!(signal.sleep(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(signal.is_stopped());
    }

    #[test]
    fn test_wait_returns_after_stop() {
        let signal = Arc::new(StopSignal::new());
        let signal2 = Arc::clone(&signal);

        let handle = thread::spawn(move || signal2.wait());

        thread::sleep(Duration::from_millis(20));
        signal.stop();
        handle.join().unwrap();
    }
}
