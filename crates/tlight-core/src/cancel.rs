//! Cancellation token for cooperative cancellation
//!
//! Waiters that would otherwise block forever can take a token and give up
//! once it is cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{LightError, LightResult};

/// Shared cancellation flag
///
/// Clones share the same flag, so one thread can cancel a wait running on
/// another.
#[derive(Clone)]
pub struct CancellationToken {
    /// `None` for a token that never cancels
    flag: Option<Arc<AtomicBool>>,
}

impl CancellationToken {
    /// Create a new, uncancelled token
    pub fn new() -> Self {
        Self {
            flag: Some(Arc::new(AtomicBool::new(false))),
        }
    }

    /// Create a token that never cancels
    pub fn never() -> Self {
        Self { flag: None }
    }

    /// Check if cancellation was requested
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Acquire))
    }

    /// Request cancellation
    pub fn cancel(&self) {
        if let Some(flag) = &self.flag {
            flag.store(true, Ordering::Release);
        }
    }

    /// Return `Err(Cancelled)` if cancellation was requested
    ///
    /// ```ignore
    /// loop {
    ///     token.check()?;
    ///     // ... wait a little ...
    /// }
    /// ```
    #[inline]
    pub fn check(&self) -> LightResult<()> {
        if self.is_cancelled() {
            Err(LightError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
