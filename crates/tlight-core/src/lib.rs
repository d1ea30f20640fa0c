//! # tlight-core
//!
//! Thread-synchronization primitives used by the `tlight` traffic light.
//! Nothing in this crate knows about phases or lights.
//!
//! ## Modules
//!
//! - `queue` - Unbounded blocking FIFO queue (mutex + condvar)
//! - `stop` - Wakeable sleep used to stop background loops
//! - `cancel` - Cancellation token for opt-in cancellable waits
//! - `error` - Error types
//! - `kprint` - Kernel-style debug printing macros
//! - `env` - Environment variable utilities

pub mod queue;
pub mod stop;
pub mod cancel;
pub mod error;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use queue::BlockingQueue;
pub use stop::StopSignal;
pub use cancel::CancellationToken;
pub use error::{LightError, LightResult};
pub use env::{env_get, env_get_bool, env_get_duration_ms, env_get_opt, env_get_str};
