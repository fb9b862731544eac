//! Button edge handling
//!
//! Runs in the provider's interrupt context: no sleeping, no logging, only
//! shared state updates and direct pin writes.

use embassy_time::Instant;

use crate::DigitalIo;
use crate::bank::LedBank;
use crate::io::{Level, Pin};
use crate::state::{ButtonLevel, RunState, SequencerState};

/// Edge handler bound to one button and one LED bank
pub struct ButtonHandler<'a, P: DigitalIo, const N: usize> {
    io: &'a P,
    state: &'a SequencerState,
    leds: &'a LedBank<N>,
    button: Pin,
    pressed_level: Level,
}

impl<'a, P: DigitalIo, const N: usize> ButtonHandler<'a, P, N> {
    pub const fn new(
        io: &'a P,
        state: &'a SequencerState,
        leds: &'a LedBank<N>,
        button: Pin,
        pressed_level: Level,
    ) -> Self {
        Self {
            io,
            state,
            leds,
            button,
            pressed_level,
        }
    }

    /// Process an edge observed at `now`
    ///
    /// Returns the newly accepted button level, or `None` when the edge was
    /// rejected as bounce, as a repeat of the current level, or because the
    /// pin could not be read.
    pub fn handle_edge(&self, now: Instant) -> Option<ButtonLevel> {
        let level = self.io.get(self.button).ok()?;
        let sensed = ButtonLevel::from_level(level, self.pressed_level);

        self.state.transact(|shared| {
            if !shared.clock.accept(shared.button, sensed, now) {
                return None;
            }
            match sensed {
                ButtonLevel::Pressed => {
                    shared.run = RunState::Stopped;
                    for pin in self.leds.iter() {
                        // A failed write cannot be reported from here, the
                        // remaining LEDs are still forced off.
                        let _ = self.io.set(pin, Level::Low);
                    }
                }
                ButtonLevel::Released => {
                    shared.run = RunState::Running;
                }
            }
            shared.button = sensed;
            Some(sensed)
        })
    }
}
