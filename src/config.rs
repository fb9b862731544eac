//! Sequencer configuration
//!
//! All values are fixed at startup.

use core::fmt;

use embassy_time::Duration;

use crate::bank::LedBank;
use crate::io::{Level, Pin};

/// Default debounce threshold for the button.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(20);

/// Default time each LED stays lit during the sequence.
pub const DEFAULT_DWELL: Duration = Duration::from_millis(500);

/// Default poll interval while the sequence is stopped.
pub const DEFAULT_IDLE_POLL: Duration = Duration::from_millis(100);

/// LED pins of the reference board, in sequence order.
pub const REFERENCE_LED_PINS: [Pin; 3] = [Pin(17), Pin(27), Pin(22)];

/// Button pin of the reference board.
pub const REFERENCE_BUTTON_PIN: Pin = Pin(4);

/// Sequencer timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerTimings {
    /// Minimum time between two accepted button edges
    pub debounce: Duration,
    /// How long each LED stays lit
    pub dwell: Duration,
    /// Re-check interval while stopped
    pub idle_poll: Duration,
}

impl SequencerTimings {
    pub const DEFAULT: Self = Self {
        debounce: DEFAULT_DEBOUNCE,
        dwell: DEFAULT_DWELL,
        idle_poll: DEFAULT_IDLE_POLL,
    };
}

impl Default for SequencerTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The LED bank must hold at least one pin
    EmptyLedBank,
    /// More LED pins than the bank capacity
    TooManyLeds,
    /// The same pin is used twice
    DuplicatePin(Pin),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLedBank => write!(f, "LED bank must contain at least one pin"),
            Self::TooManyLeds => write!(f, "LED bank capacity exceeded"),
            Self::DuplicatePin(pin) => write!(f, "pin {} is used more than once", pin.0),
        }
    }
}

/// Configuration for the LED sequencer
#[derive(Debug, Clone)]
pub struct SequencerConfig<const N: usize> {
    pub leds: LedBank<N>,
    pub button: Pin,
    /// Level the button pin reads while pressed
    pub pressed_level: Level,
    pub timings: SequencerTimings,
}

impl<const N: usize> SequencerConfig<N> {
    /// Create a configuration with default timings and an active-low button
    pub fn new(leds: &[Pin], button: Pin) -> Result<Self, ConfigError> {
        let leds = LedBank::new(leds)?;
        if leds.contains(button) {
            return Err(ConfigError::DuplicatePin(button));
        }
        Ok(Self {
            leds,
            button,
            pressed_level: Level::Low,
            timings: SequencerTimings::DEFAULT,
        })
    }

    /// Reference board wiring: three LEDs and an active-low button
    pub fn reference() -> Result<Self, ConfigError> {
        Self::new(&REFERENCE_LED_PINS, REFERENCE_BUTTON_PIN)
    }

    /// Override the level the button reads while pressed
    #[must_use]
    pub fn with_pressed_level(mut self, level: Level) -> Self {
        self.pressed_level = level;
        self
    }

    /// Override the timings
    #[must_use]
    pub fn with_timings(mut self, timings: SequencerTimings) -> Self {
        self.timings = timings;
        self
    }
}
