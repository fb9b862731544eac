//! Sequencer worker.
//!
//! [`SequenceWorker::tick`] performs one step of the sequence and returns how
//! long to wait before the next one, without sleeping itself. [`SequenceWorker::run`]
//! drives it with `embassy-time` timers and returns as soon as cancellation
//! is requested.

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::DigitalIo;
use crate::bank::LedBank;
use crate::config::SequencerTimings;
use crate::io::{IoError, Level, Pin};
use crate::state::SequencerState;

/// Cooperative stop signal for the worker
pub struct Cancellation {
    stop: Signal<CriticalSectionRawMutex, ()>,
    finished: Signal<CriticalSectionRawMutex, ()>,
}

impl Cancellation {
    pub const fn new() -> Self {
        Self {
            stop: Signal::new(),
            finished: Signal::new(),
        }
    }

    /// Ask the worker to stop
    pub fn cancel(&self) {
        self.stop.signal(());
    }

    /// Check whether a stop was requested and not yet consumed
    pub fn is_cancelled(&self) -> bool {
        self.stop.signaled()
    }

    /// Wait for a stop request
    pub async fn cancelled(&self) {
        self.stop.wait().await;
    }

    /// Report that the worker has returned
    pub fn finish(&self) {
        self.finished.signal(());
    }

    /// Wait until the worker has returned
    pub async fn finished(&self) {
        self.finished.wait().await;
    }

    /// Clear both signals
    pub fn reset(&self) {
        self.stop.reset();
        self.finished.reset();
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one worker step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStep {
    /// The LED lit by this step, if the sequence is running.
    pub lit: Option<Pin>,
    /// How long to wait before the next step.
    pub sleep_duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Lit(usize),
}

/// Drives the LED bank through the on/off sequence while the run state allows
///
/// The worker only observes the run state, it never changes it. Its position
/// in the sequence is local and never shared with the edge callback.
pub struct SequenceWorker<'a, P: DigitalIo, const N: usize> {
    io: &'a P,
    state: &'a SequencerState,
    leds: &'a LedBank<N>,
    timings: SequencerTimings,
    phase: Phase,
}

impl<'a, P: DigitalIo, const N: usize> SequenceWorker<'a, P, N> {
    pub const fn new(
        io: &'a P,
        state: &'a SequencerState,
        leds: &'a LedBank<N>,
        timings: SequencerTimings,
    ) -> Self {
        Self {
            io,
            state,
            leds,
            timings,
            phase: Phase::Idle,
        }
    }

    /// The LED currently held on by the worker
    pub fn lit(&self) -> Option<Pin> {
        match self.phase {
            Phase::Idle => None,
            Phase::Lit(index) => self.leds.get(index),
        }
    }

    /// Perform one step of the sequence.
    ///
    /// Turns off the LED lit by the previous step, then checks the run state
    /// before lighting the next LED. A stop therefore takes effect within one
    /// dwell interval instead of after a full sweep. Once stopped, the next
    /// start resumes from the first LED.
    pub fn tick(&mut self) -> WorkerStep {
        let next = match self.phase {
            Phase::Idle => 0,
            Phase::Lit(index) => {
                if let Some(pin) = self.leds.get(index) {
                    self.write(pin, Level::Low);
                }
                (index + 1) % self.leds.len()
            }
        };
        self.advance(next)
    }

    /// Light the LED at `index` if the sequence is running
    fn advance(&mut self, index: usize) -> WorkerStep {
        let Some(pin) = self.leds.get(index) else {
            self.phase = Phase::Idle;
            return self.idle_step();
        };

        // Checking the run state and lighting the LED happen in one critical
        // section, so an accepted button press can never be followed by a
        // stale turn-on.
        let outcome: Option<Result<(), IoError>> = self.state.transact(|shared| {
            shared
                .run
                .is_running()
                .then(|| self.io.set(pin, Level::High))
        });

        match outcome {
            Some(_result) => {
                #[cfg(feature = "esp32-log")]
                {
                    if self.phase == Phase::Idle {
                        println!("[SequenceWorker.tick] sequence running");
                    }
                    if let Err(err) = _result {
                        println!("[SequenceWorker.tick] failed to light pin {}: {}", pin.0, err);
                    }
                }
                self.phase = Phase::Lit(index);
                WorkerStep {
                    lit: Some(pin),
                    sleep_duration: self.timings.dwell,
                }
            }
            None => {
                #[cfg(feature = "esp32-log")]
                if self.phase != Phase::Idle {
                    println!("[SequenceWorker.tick] sequence halted");
                }
                self.phase = Phase::Idle;
                self.idle_step()
            }
        }
    }

    const fn idle_step(&self) -> WorkerStep {
        WorkerStep {
            lit: None,
            sleep_duration: self.timings.idle_poll,
        }
    }

    fn write(&self, pin: Pin, level: Level) {
        if let Err(_err) = self.io.set(pin, level) {
            #[cfg(feature = "esp32-log")]
            println!("[SequenceWorker.write] failed to drive pin {}: {}", pin.0, _err);
        }
    }

    /// Run the sequence until `cancel` is signalled
    ///
    /// Cancellation is checked before every step and raced against every
    /// sleep. Whatever LED is lit at that point is left as is.
    pub async fn run(&mut self, cancel: &Cancellation) {
        loop {
            if cancel.is_cancelled() {
                break;
            }
            let step = self.tick();
            if let Either::Second(()) =
                select(Timer::after(step.sleep_duration), cancel.cancelled()).await
            {
                break;
            }
        }
        #[cfg(feature = "esp32-log")]
        println!("[SequenceWorker.run] worker stopped");
    }
}
