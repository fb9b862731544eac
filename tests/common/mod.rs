//! Shared test infrastructure for led-sequencer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::collections::HashMap;
use std::sync::Mutex;

use led_sequencer::{
    Direction, DigitalIo, EdgeHandler, EdgeMask, Instant, IoError, LedSequencer, Level, Pin,
    SequencerConfig, SequencerTimings,
};

pub const LEDS: [Pin; 3] = [Pin(17), Pin(27), Pin(22)];
pub const BUTTON: Pin = Pin(4);

/// Raw level of the active-low reference button while pressed
pub const PRESSED: Level = Level::Low;
/// Raw level of the active-low reference button while released
pub const RELEASED: Level = Level::High;

// ============================================================================
// Mock digital I/O
// ============================================================================

/// Provider call recorded by [`MockIo`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Request(Pin, Direction),
    Release(Pin),
    Set(Pin, Level),
    Register(Pin, EdgeMask),
    Unregister(Pin),
}

#[derive(Default)]
struct Inner {
    events: Vec<Event>,
    outputs: HashMap<Pin, Level>,
    inputs: HashMap<Pin, Level>,
    claimed: Vec<Pin>,
    handler: Option<&'static dyn EdgeHandler>,
    fail_request: Option<Pin>,
    fail_release: Option<Pin>,
    fail_register: bool,
    fail_reads: bool,
}

/// Digital I/O provider that records every call
#[derive(Default)]
pub struct MockIo {
    inner: Mutex<Inner>,
}

impl MockIo {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        f(&mut *self.inner.lock().unwrap())
    }

    pub fn events(&self) -> Vec<Event> {
        self.with(|inner| inner.events.clone())
    }

    pub fn clear_events(&self) {
        self.with(|inner| inner.events.clear());
    }

    /// Number of recorded events, used to slice out what a step did
    pub fn event_count(&self) -> usize {
        self.with(|inner| inner.events.len())
    }

    pub fn events_since(&self, start: usize) -> Vec<Event> {
        self.with(|inner| inner.events[start..].to_vec())
    }

    /// Last level written to an output, low if never written
    pub fn output(&self, pin: Pin) -> Level {
        self.with(|inner| inner.outputs.get(&pin).copied().unwrap_or(Level::Low))
    }

    pub fn lit(&self, pins: &[Pin]) -> Vec<Pin> {
        pins.iter()
            .copied()
            .filter(|pin| self.output(*pin) == Level::High)
            .collect()
    }

    pub fn claimed(&self) -> Vec<Pin> {
        self.with(|inner| inner.claimed.clone())
    }

    pub fn has_handler(&self) -> bool {
        self.with(|inner| inner.handler.is_some())
    }

    pub fn set_input(&self, pin: Pin, level: Level) {
        self.with(|inner| {
            inner.inputs.insert(pin, level);
        });
    }

    pub fn fail_request_on(&self, pin: Pin) {
        self.with(|inner| inner.fail_request = Some(pin));
    }

    pub fn fail_release_on(&self, pin: Pin) {
        self.with(|inner| inner.fail_release = Some(pin));
    }

    pub fn fail_registration(&self) {
        self.with(|inner| inner.fail_register = true);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.with(|inner| inner.fail_reads = fail);
    }

    /// Change the level of `pin` and invoke the registered handler, if any
    ///
    /// Returns whether a handler was invoked.
    pub fn fire_edge(&self, pin: Pin, level: Level, now: Instant) -> bool {
        let handler = self.with(|inner| {
            inner.inputs.insert(pin, level);
            inner.handler
        });
        match handler {
            Some(handler) => {
                handler.on_edge(now);
                true
            }
            None => false,
        }
    }
}

impl DigitalIo for MockIo {
    fn request(&self, pin: Pin, direction: Direction) -> Result<(), IoError> {
        self.with(|inner| {
            if inner.fail_request == Some(pin) || inner.claimed.contains(&pin) {
                return Err(IoError::Unavailable);
            }
            inner.events.push(Event::Request(pin, direction));
            inner.claimed.push(pin);
            if direction == Direction::OutputLow {
                inner.outputs.insert(pin, Level::Low);
            }
            Ok(())
        })
    }

    fn release(&self, pin: Pin) -> Result<(), IoError> {
        self.with(|inner| {
            if inner.fail_release == Some(pin) {
                return Err(IoError::Fault);
            }
            inner.events.push(Event::Release(pin));
            inner.claimed.retain(|claimed| *claimed != pin);
            Ok(())
        })
    }

    fn set(&self, pin: Pin, level: Level) -> Result<(), IoError> {
        self.with(|inner| {
            inner.events.push(Event::Set(pin, level));
            inner.outputs.insert(pin, level);
            Ok(())
        })
    }

    fn get(&self, pin: Pin) -> Result<Level, IoError> {
        self.with(|inner| {
            if inner.fail_reads {
                return Err(IoError::Fault);
            }
            Ok(inner.inputs.get(&pin).copied().unwrap_or(RELEASED))
        })
    }

    fn register_edge_callback(
        &self,
        pin: Pin,
        edges: EdgeMask,
        handler: &'static dyn EdgeHandler,
    ) -> Result<(), IoError> {
        self.with(|inner| {
            if inner.fail_register {
                return Err(IoError::Fault);
            }
            inner.events.push(Event::Register(pin, edges));
            inner.handler = Some(handler);
            Ok(())
        })
    }

    fn unregister_edge_callback(&self, pin: Pin) -> Result<(), IoError> {
        self.with(|inner| {
            inner.events.push(Event::Unregister(pin));
            inner.handler = None;
            Ok(())
        })
    }
}

// ============================================================================
// Sequencer helpers
// ============================================================================

pub type TestSequencer = LedSequencer<MockIo, 3>;

pub fn reference_config() -> SequencerConfig<3> {
    SequencerConfig::reference().unwrap()
}

pub fn sequencer() -> TestSequencer {
    LedSequencer::new(MockIo::new(), reference_config())
}

pub fn sequencer_with_timings(timings: SequencerTimings) -> TestSequencer {
    LedSequencer::new(MockIo::new(), reference_config().with_timings(timings))
}

/// A sequencer that can be started, as `start` needs a `'static` borrow
pub fn leaked_sequencer() -> &'static TestSequencer {
    Box::leak(Box::new(sequencer()))
}

pub fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

/// Deliver an edge with the button at `level` directly to the handler
pub fn edge(seq: &TestSequencer, level: Level, ms: u64) {
    seq.io().set_input(BUTTON, level);
    seq.on_edge(at(ms));
}
