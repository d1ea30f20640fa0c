//! Error types for tlight

use core::fmt;

/// Result type for light operations
pub type LightResult<T> = Result<T, LightError>;

/// Errors returned by the opt-in parts of the API
///
/// The default blocking calls (`receive`, `wait_for_green`) never fail;
/// these cover timeouts, cancellation and lifecycle misuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightError {
    /// Wait was cancelled via CancellationToken
    Cancelled,

    /// Wait timed out
    Timeout,

    /// `simulate()` was already called on this light
    AlreadySimulating,

    /// The cycling thread could not be spawned
    SpawnFailed,

    /// Configuration rejected by `validate()`
    InvalidConfig(&'static str),
}

impl fmt::Display for LightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightError::Cancelled => write!(f, "wait cancelled"),
            LightError::Timeout => write!(f, "wait timed out"),
            LightError::AlreadySimulating => write!(f, "light is already simulating"),
            LightError::SpawnFailed => write!(f, "failed to spawn cycling thread"),
            LightError::InvalidConfig(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for LightError {}
