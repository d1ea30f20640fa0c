//! Traffic light phase

use core::fmt;

/// Phase of a traffic light
///
/// A light only ever alternates between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Traffic must wait (initial phase)
    #[default]
    Stop,
    /// Traffic may proceed
    Go,
}

impl Phase {
    /// The phase a light switches to from this one
    #[inline]
    pub const fn toggled(self) -> Self {
        match self {
            Phase::Stop => Phase::Go,
            Phase::Go => Phase::Stop,
        }
    }

    #[inline]
    pub const fn is_go(self) -> bool {
        matches!(self, Phase::Go)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Stop => "stop",
            Phase::Go => "go",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
