use core::fmt;

use crate::state::RunState;

const COMMAND_NAME_START: &str = "start";
const COMMAND_NAME_STOP: &str = "stop";

/// Longest command text accepted, in bytes.
pub const MAX_COMMAND_LEN: usize = 15;

/// Start/stop request delivered by the command channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
}

/// Rejected command text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// More than [`MAX_COMMAND_LEN`] bytes
    TooLong { len: usize },
    /// Not a known command
    Unrecognized,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { len } => {
                write!(f, "command is {len} bytes, at most {MAX_COMMAND_LEN} allowed")
            }
            Self::Unrecognized => write!(f, "unrecognized command"),
        }
    }
}

impl Command {
    /// Parse raw command bytes
    ///
    /// Only the exact texts `start` and `stop` are accepted, without any
    /// surrounding whitespace.
    pub fn parse(bytes: &[u8]) -> Result<Self, CommandError> {
        if bytes.len() > MAX_COMMAND_LEN {
            return Err(CommandError::TooLong { len: bytes.len() });
        }
        match bytes {
            b if b == COMMAND_NAME_START.as_bytes() => Ok(Self::Start),
            b if b == COMMAND_NAME_STOP.as_bytes() => Ok(Self::Stop),
            _ => Err(CommandError::Unrecognized),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => COMMAND_NAME_START,
            Self::Stop => COMMAND_NAME_STOP,
        }
    }

    /// Run state this command requests
    pub const fn run_state(self) -> RunState {
        match self {
            Self::Start => RunState::Running,
            Self::Stop => RunState::Stopped,
        }
    }
}

impl core::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.as_bytes())
    }
}
