//! Scoped pin acquisition
//!
//! Pins claimed through a [`PinGuard`] are released again when the guard is
//! dropped, unless [`PinGuard::commit`] handed them over first. A startup
//! sequence that bails out with `?` therefore never leaves a pin claimed.

use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::DigitalIo;
use crate::bank::LedBank;
use crate::error::SequencerError;
use crate::io::{Direction, Pin};

/// Claimed pins, released on drop unless committed
pub struct PinGuard<'a, P: DigitalIo, const N: usize> {
    io: &'a P,
    outputs: Vec<Pin, N>,
    input: Option<Pin>,
}

impl<'a, P: DigitalIo, const N: usize> PinGuard<'a, P, N> {
    pub const fn new(io: &'a P) -> Self {
        Self {
            io,
            outputs: Vec::new(),
            input: None,
        }
    }

    /// Claim every LED pin as an output driven low, in bank order
    pub fn claim_outputs(&mut self, leds: &LedBank<N>) -> Result<(), SequencerError> {
        for pin in leds.iter() {
            self.io
                .request(pin, Direction::OutputLow)
                .map_err(|source| SequencerError::ResourceAcquisition { pin, source })?;
            let pushed = self.outputs.push(pin);
            debug_assert!(pushed.is_ok(), "bank and guard share capacity N");
        }
        Ok(())
    }

    /// Claim the button pin as an input
    pub fn claim_input(&mut self, pin: Pin) -> Result<(), SequencerError> {
        self.io
            .request(pin, Direction::Input)
            .map_err(|source| SequencerError::ResourceAcquisition { pin, source })?;
        self.input = Some(pin);
        Ok(())
    }

    /// Keep the pins claimed past the guard's lifetime
    pub fn commit(mut self) {
        self.outputs.clear();
        self.input = None;
    }
}

impl<P: DigitalIo, const N: usize> Drop for PinGuard<'_, P, N> {
    fn drop(&mut self) {
        if let Some(pin) = self.input.take() {
            release(self.io, pin);
        }
        while let Some(pin) = self.outputs.pop() {
            release(self.io, pin);
        }
    }
}

fn release<P: DigitalIo>(io: &P, pin: Pin) {
    #[cfg(feature = "esp32-log")]
    println!("[PinGuard.drop] rolling back pin {}", pin.0);
    if let Err(_err) = io.release(pin) {
        #[cfg(feature = "esp32-log")]
        println!("[PinGuard.drop] failed to release pin {}: {}", pin.0, _err);
    }
}
