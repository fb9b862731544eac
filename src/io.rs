//! Pin vocabulary shared with the digital I/O provider.

use core::fmt;

/// Provider-defined numeric pin handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pin(pub u32);

/// Digital signal level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

/// Direction a pin is requested with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Output, driven low as soon as it is claimed
    OutputLow,
    /// Input
    Input,
}

/// Which signal edges trigger the edge callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMask {
    /// Low to high
    Rising,
    /// High to low
    Falling,
    /// Any transition
    Both,
}

/// Failure reported by the digital I/O provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoError {
    /// The pin is already claimed or does not exist
    Unavailable,
    /// The provider failed to carry out the operation
    Fault,
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "pin unavailable"),
            Self::Fault => write!(f, "provider fault"),
        }
    }
}
