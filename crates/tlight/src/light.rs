//! Traffic light state machine
//!
//! A `TrafficLight` starts in `Phase::Stop`. Once `simulate()` is called, a
//! dedicated OS thread (the cycling thread) toggles the phase after a random
//! delay drawn from the configured window and publishes every new phase
//! into the light's `BlockingQueue<Phase>`.
//!
//! # Locks
//!
//! ```text
//!   cycling thread                         consumers
//!   ──────────────                         ─────────
//!   sleep(random)
//!   lock(phase) ─ toggle ─ unlock          current_phase(): lock(phase) ─ copy ─ unlock
//!   queue.send(phase) ───────────────────► wait_for_green(): queue.receive() ...
//!   sleep(yield_interval)
//! ```
//!
//! The phase lock and the queue lock are never held together.
//!
//! # Delivery
//!
//! Phase messages are consumed, not broadcast: when several threads wait
//! for green at once, each queued message wakes exactly one of them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::Rng;

use tlight_core::{
    kdebug, kerror, kinfo, kwarn, BlockingQueue, CancellationToken, LightError, LightResult,
    StopSignal,
};

use crate::config::LightConfig;
use crate::phase::Phase;

/// Statistics from cycling thread execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Total phase changes published
    pub transitions: u64,

    /// Changes into `Phase::Go`
    pub go_count: u64,

    /// Changes into `Phase::Stop`
    pub stop_count: u64,

    /// Sum of the randomized waits that ran to completion
    pub total_wait: Duration,
}

impl CycleStats {
    fn record(&mut self, phase: Phase, waited: Duration) {
        self.transitions += 1;
        self.total_wait += waited;
        match phase {
            Phase::Go => self.go_count += 1,
            Phase::Stop => self.stop_count += 1,
        }
    }
}

/// State shared between the light handle and its cycling thread
struct Shared {
    phase: Mutex<Phase>,
    queue: BlockingQueue<Phase>,
    stop: StopSignal,
    config: LightConfig,
}

/// A single traffic light driven by its own background thread
///
/// `TrafficLight` is `Sync`: share it behind an `Arc` and call
/// `current_phase()` or `wait_for_green()` from any number of threads.
///
/// # Example
///
/// ```ignore
/// let light = Arc::new(TrafficLight::new());
/// light.simulate()?;
///
/// light.wait_for_green();
/// assert_eq!(light.current_phase(), Phase::Go);
/// ```
pub struct TrafficLight {
    shared: Arc<Shared>,
    started: AtomicBool,
    cycler: Mutex<Option<JoinHandle<CycleStats>>>,
}

impl TrafficLight {
    /// Create a light configured from the environment
    ///
    /// Falls back to the built-in defaults if the environment describes an
    /// invalid configuration.
    pub fn new() -> Self {
        let config = LightConfig::from_env();
        if let Err(e) = config.validate() {
            kwarn!("ignoring environment light config: {}", e);
            return Self::build(LightConfig::builtin());
        }
        Self::build(config)
    }

    /// Create a light with an explicit configuration
    pub fn with_config(config: LightConfig) -> LightResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: LightConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                phase: Mutex::new(Phase::Stop),
                queue: BlockingQueue::new(),
                stop: StopSignal::new(),
                config,
            }),
            started: AtomicBool::new(false),
            cycler: Mutex::new(None),
        }
    }

    /// Configuration this light was built with
    pub fn config(&self) -> &LightConfig {
        &self.shared.config
    }

    /// Start the cycling thread and return immediately
    ///
    /// A light cycles at most once in its lifetime: any further call,
    /// including one after `shutdown()`, returns `AlreadySimulating`.
    pub fn simulate(&self) -> LightResult<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            kwarn!("simulate() called on a light that is already cycling");
            return Err(LightError::AlreadySimulating);
        }

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name(self.shared.config.thread_name.clone())
            .spawn(move || cycle_through_phases(&shared))
            .map_err(|e| {
                kerror!("failed to spawn cycling thread: {}", e);
                self.started.store(false, Ordering::SeqCst);
                LightError::SpawnFailed
            })?;

        *self.cycler.lock() = Some(handle);
        kinfo!(
            "light cycling, window {:?}..={:?}",
            self.shared.config.cycle_min,
            self.shared.config.cycle_max
        );
        Ok(())
    }

    /// Snapshot of the most recently committed phase
    pub fn current_phase(&self) -> Phase {
        *self.shared.phase.lock()
    }

    /// Block until the light publishes a change to `Phase::Go`
    ///
    /// Changes queued before the call are discarded first, so a caller
    /// always waits for a fresh transition; the current snapshot is not
    /// consulted. Blocks forever if the light never cycles.
    pub fn wait_for_green(&self) {
        self.shared.queue.clear();
        loop {
            if self.shared.queue.receive().is_go() {
                return;
            }
        }
    }

    /// Like `wait_for_green`, but gives up after `timeout`
    pub fn wait_for_green_timeout(&self, timeout: Duration) -> LightResult<()> {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => {
                self.wait_for_green();
                return Ok(());
            }
        };

        self.shared.queue.clear();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.shared.queue.receive_timeout(remaining) {
                Some(Phase::Go) => return Ok(()),
                Some(Phase::Stop) => continue,
                None => return Err(LightError::Timeout),
            }
        }
    }

    /// Like `wait_for_green`, but returns `Cancelled` once `token` fires
    ///
    /// The token is checked at least every `poll_interval`.
    pub fn wait_for_green_cancellable(&self, token: &CancellationToken) -> LightResult<()> {
        token.check()?;
        self.shared.queue.clear();

        let poll = self.shared.config.poll_interval;
        loop {
            if let Some(Phase::Go) = self.shared.queue.receive_timeout(poll) {
                return Ok(());
            }
            token.check()?;
        }
    }

    /// Check if the cycling thread is alive
    pub fn is_running(&self) -> bool {
        self.cycler
            .lock()
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    /// Stop the cycling thread and wait for it to exit
    ///
    /// Interrupts the current random wait. Returns the thread's stats, or
    /// `None` if it was never started or has already been shut down.
    ///
    /// No further phases are published afterwards, so a thread parked in
    /// `wait_for_green()` stays parked forever. Waiters that may outlive
    /// the light should use `wait_for_green_timeout` or
    /// `wait_for_green_cancellable` instead.
    pub fn shutdown(&self) -> Option<CycleStats> {
        self.shared.stop.stop();

        let handle = self.cycler.lock().take()?;
        match handle.join() {
            Ok(stats) => {
                kinfo!(
                    "light stopped after {} transitions ({} go, {} stop)",
                    stats.transitions,
                    stats.go_count,
                    stats.stop_count
                );
                Some(stats)
            }
            Err(_) => {
                kerror!("cycling thread panicked");
                None
            }
        }
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TrafficLight {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for TrafficLight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrafficLight")
            .field("phase", &self.current_phase())
            .field("queued", &self.shared.queue.len())
            .field("running", &self.is_running())
            .finish()
    }
}

/// Draw one phase duration, uniform over `[cycle_min, cycle_max]`
fn cycle_duration<R: Rng>(rng: &mut R, config: &LightConfig) -> Duration {
    rng.gen_range(config.cycle_min..=config.cycle_max)
}

/// Body of the cycling thread
fn cycle_through_phases(shared: &Shared) -> CycleStats {
    let mut stats = CycleStats::default();
    let mut rng = rand::thread_rng();

    loop {
        let wait = cycle_duration(&mut rng, &shared.config);
        if shared.stop.sleep(wait) {
            break;
        }

        let phase = {
            let mut current = shared.phase.lock();
            *current = current.toggled();
            *current
        };

        stats.record(phase, wait);
        kdebug!("phase -> {} after {:?}", phase, wait);
        shared.queue.send(phase);

        if shared.stop.sleep(shared.config.yield_interval) {
            break;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fast_config() -> LightConfig {
        LightConfig::builtin()
            .cycle_window(Duration::from_millis(5), Duration::from_millis(15))
            .yield_interval(Duration::from_millis(1))
            .poll_interval(Duration::from_millis(2))
            .thread_name("tlight-test")
    }

    fn fast_light() -> Arc<TrafficLight> {
        Arc::new(TrafficLight::with_config(fast_config()).unwrap())
    }

    #[test]
    fn test_initial_phase_is_stop() {
        let light = fast_light();
        assert_eq!(light.current_phase(), Phase::Stop);
        assert!(!light.is_running());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = fast_config().cycle_window(Duration::from_millis(9), Duration::from_millis(1));
        assert!(matches!(
            TrafficLight::with_config(config),
            Err(LightError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_cycle_duration_in_window() {
        let config = LightConfig::builtin();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let d = cycle_duration(&mut rng, &config);
            assert!(d >= Duration::from_millis(4000));
            assert!(d <= Duration::from_millis(6000));
        }
    }

    #[test]
    fn test_cycle_duration_fixed_window() {
        let d = Duration::from_millis(3);
        let config = LightConfig::builtin().cycle_window(d, d);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(cycle_duration(&mut rng, &config), d);
    }

    #[test]
    fn test_simulate_twice_rejected() {
        let light = fast_light();
        light.simulate().unwrap();
        assert!(light.is_running());
        assert_eq!(light.simulate(), Err(LightError::AlreadySimulating));
    }

    #[test]
    fn test_phase_changes_after_simulate() {
        let light = fast_light();
        light.simulate().unwrap();

        let start = Instant::now();
        while light.current_phase() == Phase::Stop {
            assert!(start.elapsed() < Duration::from_secs(5), "light never changed");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_queued_phases_alternate() {
        let light = fast_light();
        light.simulate().unwrap();

        // Nothing else consumes, so every transition is seen in order
        let mut previous = Phase::Stop;
        for _ in 0..10 {
            let phase = light.shared.queue.receive();
            assert_ne!(phase, previous);
            previous = phase;
        }
    }

    #[test]
    fn test_wait_for_green_consumes_go_message() {
        let light = fast_light();

        // Snapshot already says go; the waiter must still wait for a message
        *light.shared.phase.lock() = Phase::Go;

        let waiter = {
            let light = Arc::clone(&light);
            thread::spawn(move || light.wait_for_green())
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());

        light.shared.queue.send(Phase::Stop);
        thread::sleep(Duration::from_millis(20));
        assert!(!waiter.is_finished());

        light.shared.queue.send(Phase::Go);
        waiter.join().unwrap();
        assert!(light.shared.queue.is_empty());
    }

    #[test]
    fn test_wait_for_green_ignores_queued_go() {
        let light = fast_light();

        // Left over from before the call; must not satisfy the wait
        light.shared.queue.send(Phase::Go);

        let waiter = {
            let light = Arc::clone(&light);
            thread::spawn(move || light.wait_for_green())
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());
        assert!(light.shared.queue.is_empty());

        light.shared.queue.send(Phase::Go);
        waiter.join().unwrap();
    }

    #[test]
    fn test_thread_name_with_null_rejected() {
        let config = fast_config().thread_name("bad\0name");
        assert!(matches!(
            TrafficLight::with_config(config),
            Err(LightError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_wait_for_green_discards_stale() {
        let light = fast_light();
        light.shared.queue.send(Phase::Go);

        let result = light.wait_for_green_timeout(Duration::from_millis(50));
        assert_eq!(result, Err(LightError::Timeout));
    }

    #[test]
    fn test_wait_for_green_with_cycling_light() {
        let light = fast_light();
        light.simulate().unwrap();

        for _ in 0..3 {
            light.wait_for_green();
        }
    }

    #[test]
    fn test_wait_for_green_timeout_unstarted() {
        let light = fast_light();
        let start = Instant::now();

        let result = light.wait_for_green_timeout(Duration::from_millis(50));
        assert_eq!(result, Err(LightError::Timeout));
        assert!(start.elapsed() >= Duration::from_millis(40)); // Allow some slack
    }

    #[test]
    fn test_wait_for_green_timeout_succeeds() {
        let light = fast_light();
        light.simulate().unwrap();

        assert!(light.wait_for_green_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_wait_for_green_cancelled() {
        let light = fast_light();
        let token = CancellationToken::new();

        let waiter = {
            let light = Arc::clone(&light);
            let token = token.clone();
            thread::spawn(move || light.wait_for_green_cancellable(&token))
        };

        thread::sleep(Duration::from_millis(30));
        token.cancel();

        assert_eq!(waiter.join().unwrap(), Err(LightError::Cancelled));
    }

    #[test]
    fn test_wait_for_green_precancelled() {
        let light = fast_light();
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(
            light.wait_for_green_cancellable(&token),
            Err(LightError::Cancelled)
        );
    }

    #[test]
    fn test_wait_for_green_cancellable_succeeds() {
        let light = fast_light();
        light.simulate().unwrap();

        let token = CancellationToken::never();
        assert!(light.wait_for_green_cancellable(&token).is_ok());
    }

    #[test]
    fn test_concurrent_waiters_all_return() {
        let light = fast_light();
        light.simulate().unwrap();

        let waiters: Vec<_> = (0..8)
            .map(|_| {
                let light = Arc::clone(&light);
                thread::spawn(move || light.wait_for_green())
            })
            .collect();

        for waiter in waiters {
            waiter.join().unwrap();
        }
    }

    #[test]
    fn test_shutdown_interrupts_long_wait() {
        let config = fast_config()
            .cycle_window(Duration::from_secs(30), Duration::from_secs(60));
        let light = TrafficLight::with_config(config).unwrap();
        light.simulate().unwrap();

        let start = Instant::now();
        let stats = light.shutdown().unwrap();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(stats, CycleStats::default());
        assert!(!light.is_running());
        assert_eq!(light.current_phase(), Phase::Stop);
    }

    #[test]
    fn test_shutdown_reports_transitions() {
        let light = fast_light();
        light.simulate().unwrap();
        light.wait_for_green();

        let stats = light.shutdown().unwrap();
        assert!(stats.transitions >= 1);
        assert_eq!(stats.go_count + stats.stop_count, stats.transitions);
        // Alternation starting from stop: go is never behind stop
        assert!(stats.go_count - stats.stop_count <= 1);
        assert!(stats.total_wait >= Duration::from_millis(5));

        let expected = if stats.transitions % 2 == 1 { Phase::Go } else { Phase::Stop };
        assert_eq!(light.current_phase(), expected);
    }

    #[test]
    fn test_shutdown_without_simulate() {
        let light = fast_light();
        assert!(light.shutdown().is_none());
        assert!(light.shutdown().is_none());
    }

    #[test]
    fn test_simulate_after_shutdown_rejected() {
        let light = fast_light();
        light.simulate().unwrap();
        light.shutdown();
        assert_eq!(light.simulate(), Err(LightError::AlreadySimulating));
    }
}
