use heapless::Vec;

use crate::config::ConfigError;
use crate::io::Pin;

/// Ordered, fixed set of LED output pins
///
/// N is the maximum number of LEDs the bank can hold
#[derive(Debug, Clone)]
pub struct LedBank<const N: usize> {
    pins: Vec<Pin, N>,
}

impl<const N: usize> LedBank<N> {
    /// Build a bank from pins in sequence order
    pub fn new(pins: &[Pin]) -> Result<Self, ConfigError> {
        if pins.is_empty() {
            return Err(ConfigError::EmptyLedBank);
        }
        let mut bank = Vec::new();
        for (index, pin) in pins.iter().enumerate() {
            if pins[..index].contains(pin) {
                return Err(ConfigError::DuplicatePin(*pin));
            }
            bank.push(*pin).map_err(|_| ConfigError::TooManyLeds)?;
        }
        Ok(Self { pins: bank })
    }

    /// Get the number of LEDs in the bank
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Check whether the bank has no pins
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Get the pin at sequence position `index`
    pub fn get(&self, index: usize) -> Option<Pin> {
        self.pins.get(index).copied()
    }

    /// Check whether the bank drives `pin`
    pub fn contains(&self, pin: Pin) -> bool {
        self.pins.contains(&pin)
    }

    /// Pins in sequence order
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Iterate over pins in sequence order
    pub fn iter(&self) -> impl Iterator<Item = Pin> + '_ {
        self.pins.iter().copied()
    }
}
