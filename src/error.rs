use core::fmt;

use crate::command::CommandError;
use crate::io::{IoError, Pin};
use crate::sequencer::Lifecycle;

/// Errors reported by [`LedSequencer`](crate::LedSequencer) operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerError {
    /// A pin could not be claimed during startup; nothing stays claimed
    ResourceAcquisition { pin: Pin, source: IoError },
    /// The button edge callback could not be registered; nothing stays claimed
    CallbackRegistration { pin: Pin, source: IoError },
    /// Command text was rejected, the run state is unchanged
    InvalidCommand(CommandError),
    /// Operation called in the wrong lifecycle phase
    InvalidState {
        expected: Lifecycle,
        actual: Lifecycle,
    },
    /// A worker is already running for this sequencer
    WorkerAlreadyRunning,
    /// A shutdown step failed; the remaining steps were still carried out
    Cleanup { pin: Pin, source: IoError },
}

impl fmt::Display for SequencerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceAcquisition { pin, source } => {
                write!(f, "failed to request pin {}: {}", pin.0, source)
            }
            Self::CallbackRegistration { pin, source } => {
                write!(f, "failed to register edge callback on pin {}: {}", pin.0, source)
            }
            Self::InvalidCommand(err) => write!(f, "invalid command: {err}"),
            Self::InvalidState { expected, actual } => {
                write!(f, "invalid state: expected {expected:?}, but sequencer is {actual:?}")
            }
            Self::WorkerAlreadyRunning => write!(f, "worker already running"),
            Self::Cleanup { pin, source } => {
                write!(f, "failed to clean up pin {}: {}", pin.0, source)
            }
        }
    }
}

impl From<CommandError> for SequencerError {
    fn from(err: CommandError) -> Self {
        Self::InvalidCommand(err)
    }
}
