#![no_std]

pub mod acquire;
pub mod bank;
pub mod button;
pub mod command;
pub mod config;
pub mod debounce;
pub mod error;
pub mod io;
pub mod sequencer;
pub mod state;
pub mod worker;

pub use acquire::PinGuard;
pub use bank::LedBank;
pub use button::ButtonHandler;
pub use command::{Command, CommandError, MAX_COMMAND_LEN};
pub use config::{
    ConfigError, DEFAULT_DEBOUNCE, DEFAULT_DWELL, DEFAULT_IDLE_POLL, SequencerConfig,
    SequencerTimings,
};
pub use debounce::DebounceClock;
pub use error::SequencerError;
pub use io::{Direction, EdgeMask, IoError, Level, Pin};
pub use sequencer::{LedSequencer, Lifecycle};
pub use state::{ButtonLevel, RunState, SequencerState, StateSnapshot};
pub use worker::{Cancellation, SequenceWorker, WorkerStep};
pub use embassy_time::{Duration, Instant};

/// Abstract digital I/O provider
///
/// Implement this trait to support different GPIO backends. The provider is
/// shared between the worker and the edge callback, so each per-pin call must
/// be safe to issue from either context and must not block.
pub trait DigitalIo: Sync {
    /// Claim a pin
    fn request(&self, pin: Pin, direction: Direction) -> Result<(), IoError>;

    /// Give a claimed pin back
    fn release(&self, pin: Pin) -> Result<(), IoError>;

    /// Drive an output pin
    fn set(&self, pin: Pin, level: Level) -> Result<(), IoError>;

    /// Sense an input pin
    fn get(&self, pin: Pin) -> Result<Level, IoError>;

    /// Invoke `handler` on every matching edge of `pin`
    fn register_edge_callback(
        &self,
        pin: Pin,
        edges: EdgeMask,
        handler: &'static dyn EdgeHandler,
    ) -> Result<(), IoError>;

    /// Stop invoking the handler registered for `pin`
    fn unregister_edge_callback(&self, pin: Pin) -> Result<(), IoError>;
}

/// Receiver of button edges
///
/// Called from the provider's interrupt context. The method is synchronous on
/// purpose: it has no way to await a timer or any other suspending primitive.
pub trait EdgeHandler: Sync {
    /// Handle an edge observed at `now`
    fn on_edge(&self, now: Instant);
}
