//! Shared sequencer state.
//!
//! Run state, last accepted button level and the debounce clock live behind a
//! single `critical-section` mutex. Both the edge callback and the worker go
//! through [`SequencerState::transact`], so every read-modify-write is one
//! indivisible step regardless of which context performs it.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Duration;

use crate::debounce::DebounceClock;
use crate::io::Level;

/// Whether the LED sequence should advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

impl RunState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Last accepted (debounced) button level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonLevel {
    #[default]
    Released,
    Pressed,
}

impl ButtonLevel {
    /// Interpret a raw pin level given the level the button reads while pressed
    pub fn from_level(level: Level, pressed_level: Level) -> Self {
        if level == pressed_level {
            Self::Pressed
        } else {
            Self::Released
        }
    }
}

/// Copy of the externally visible state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSnapshot {
    pub run: RunState,
    pub button: ButtonLevel,
}

/// Fields guarded by the state mutex
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) run: RunState,
    pub(crate) button: ButtonLevel,
    pub(crate) clock: DebounceClock,
}

/// State shared between the edge callback, the worker and command submitters
pub struct SequencerState {
    inner: Mutex<RefCell<Shared>>,
}

impl SequencerState {
    /// Create the startup state: stopped, button released
    pub const fn new(debounce: Duration) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Shared {
                run: RunState::Stopped,
                button: ButtonLevel::Released,
                clock: DebounceClock::new(debounce),
            })),
        }
    }

    /// Run `f` with exclusive access to the shared fields
    ///
    /// Anything done inside `f`, pin writes included, is observed by the
    /// other context as a single step. `f` must not block.
    pub(crate) fn transact<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> R {
        critical_section::with(|cs| {
            let mut shared = self.inner.borrow(cs).borrow_mut();
            f(&mut *shared)
        })
    }

    pub fn run_state(&self) -> RunState {
        self.transact(|shared| shared.run)
    }

    pub fn button_level(&self) -> ButtonLevel {
        self.transact(|shared| shared.button)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.transact(|shared| StateSnapshot {
            run: shared.run,
            button: shared.button,
        })
    }

    /// Set the run state, returning the previous one
    pub fn set_run_state(&self, run: RunState) -> RunState {
        self.transact(|shared| core::mem::replace(&mut shared.run, run))
    }

    /// Copy of the debounce clock
    pub fn debounce_clock(&self) -> DebounceClock {
        self.transact(|shared| shared.clock)
    }
}
