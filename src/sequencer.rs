use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::acquire::PinGuard;
use crate::button::ButtonHandler;
use crate::command::Command;
use crate::config::SequencerConfig;
use crate::error::SequencerError;
use crate::io::{EdgeMask, IoError, Level, Pin};
use crate::state::{SequencerState, StateSnapshot};
use crate::worker::{Cancellation, SequenceWorker};
use crate::{DigitalIo, EdgeHandler};

/// Lifecycle phase of a [`LedSequencer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, no pins claimed
    Idle,
    /// Pins claimed and edge callback registered
    Started,
    /// Everything released, terminal
    ShutDown,
}

#[derive(Debug, Clone, Copy)]
struct Control {
    lifecycle: Lifecycle,
    worker_active: bool,
}

/// LED sequencer - owns the provider binding and coordinates the edge
/// callback, the worker and command submitters
///
/// Typical use on a target: place the sequencer in a `static`, call
/// [`start`](Self::start), spawn a task awaiting [`run`](Self::run) and feed
/// parsed commands to [`submit`](Self::submit). On teardown await
/// [`shutdown`](Self::shutdown).
pub struct LedSequencer<P: DigitalIo, const N: usize> {
    io: P,
    config: SequencerConfig<N>,
    state: SequencerState,
    cancel: Cancellation,
    control: Mutex<RefCell<Control>>,
}

impl<P: DigitalIo, const N: usize> LedSequencer<P, N> {
    /// Create a stopped sequencer; no pin is touched until `start`
    pub fn new(io: P, config: SequencerConfig<N>) -> Self {
        let state = SequencerState::new(config.timings.debounce);
        Self {
            io,
            config,
            state,
            cancel: Cancellation::new(),
            control: Mutex::new(RefCell::new(Control {
                lifecycle: Lifecycle::Idle,
                worker_active: false,
            })),
        }
    }

    pub fn io(&self) -> &P {
        &self.io
    }

    pub fn config(&self) -> &SequencerConfig<N> {
        &self.config
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.with_control(|control| control.lifecycle)
    }

    fn with_control<R>(&self, f: impl FnOnce(&mut Control) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.control.borrow(cs).borrow_mut()))
    }

    /// Edge handler view over this sequencer's pins and state
    pub fn button_handler(&self) -> ButtonHandler<'_, P, N> {
        ButtonHandler::new(
            &self.io,
            &self.state,
            &self.config.leds,
            self.config.button,
            self.config.pressed_level,
        )
    }

    /// A fresh worker positioned before the first LED
    pub fn worker(&self) -> SequenceWorker<'_, P, N> {
        SequenceWorker::new(&self.io, &self.state, &self.config.leds, self.config.timings)
    }

    /// Apply a start/stop command to the run state
    ///
    /// Uses the same synchronization as the button path and leaves the
    /// button level untouched.
    pub fn submit(&self, command: Command) {
        let _previous = self.state.set_run_state(command.run_state());
        #[cfg(feature = "esp32-log")]
        println!(
            "[LedSequencer.submit] {} ({:?} -> {:?})",
            command.as_str(),
            _previous,
            command.run_state()
        );
    }

    /// Parse raw command bytes and apply them
    ///
    /// Returns the number of bytes consumed. Rejected input leaves the run
    /// state unchanged.
    pub fn write_command(&self, bytes: &[u8]) -> Result<usize, SequencerError> {
        let command = Command::parse(bytes).inspect_err(|_err| {
            #[cfg(feature = "esp32-log")]
            println!("[LedSequencer.write_command] invalid command: {}", _err);
        })?;
        self.submit(command);
        Ok(bytes.len())
    }

    /// Claim all pins, then register the button edge callback
    ///
    /// Every LED pin and the button pin are claimed before anything else
    /// happens. If any claim or the registration fails, all pins claimed so
    /// far are released before the error is returned.
    pub fn start(&'static self) -> Result<(), SequencerError>
    where
        P: 'static,
    {
        let actual = self.lifecycle();
        if actual != Lifecycle::Idle {
            return Err(SequencerError::InvalidState {
                expected: Lifecycle::Idle,
                actual,
            });
        }

        if let Err(err) = self.acquire() {
            #[cfg(feature = "esp32-log")]
            println!("[LedSequencer.start] startup failed: {}", err);
            return Err(err);
        }

        self.cancel.reset();
        self.with_control(|control| control.lifecycle = Lifecycle::Started);
        #[cfg(feature = "esp32-log")]
        println!(
            "[LedSequencer.start] initialized with {} LEDs, button on pin {}",
            self.config.leds.len(),
            self.config.button.0
        );
        Ok(())
    }

    fn acquire(&'static self) -> Result<(), SequencerError>
    where
        P: 'static,
    {
        let button = self.config.button;
        let mut guard = PinGuard::new(&self.io);
        guard.claim_outputs(&self.config.leds)?;
        guard.claim_input(button)?;
        self.io
            .register_edge_callback(button, EdgeMask::Both, self)
            .map_err(|source| SequencerError::CallbackRegistration {
                pin: button,
                source,
            })?;
        guard.commit();
        Ok(())
    }

    /// Worker entry point, returns once shutdown cancels it
    ///
    /// Fails without touching any pin unless the sequencer is started and no
    /// other worker is running.
    pub async fn run(&self) -> Result<(), SequencerError> {
        self.with_control(|control| {
            if control.lifecycle != Lifecycle::Started {
                return Err(SequencerError::InvalidState {
                    expected: Lifecycle::Started,
                    actual: control.lifecycle,
                });
            }
            if control.worker_active {
                return Err(SequencerError::WorkerAlreadyRunning);
            }
            control.worker_active = true;
            // No stop can be pending while started; drop a stale completion
            // left by an earlier worker
            self.cancel.reset();
            Ok(())
        })?;

        let _active = ActiveWorker {
            control: &self.control,
            cancel: &self.cancel,
        };
        let mut worker = self.worker();
        worker.run(&self.cancel).await;
        Ok(())
    }

    /// Tear everything down in order
    ///
    /// Stops the worker and waits for it, unregisters the edge callback,
    /// drives every LED low, then releases the LED pins and the button pin.
    /// Steps keep going after a failure; the first failure is returned.
    pub async fn shutdown(&self) -> Result<(), SequencerError> {
        let worker_active = self.with_control(|control| {
            if control.lifecycle != Lifecycle::Started {
                return Err(SequencerError::InvalidState {
                    expected: Lifecycle::Started,
                    actual: control.lifecycle,
                });
            }
            control.lifecycle = Lifecycle::ShutDown;
            Ok(control.worker_active)
        })?;

        if worker_active {
            self.cancel.cancel();
            self.cancel.finished().await;
        }

        let button = self.config.button;
        let mut first_err = None;
        let mut record = |pin: Pin, result: Result<(), IoError>| {
            if let Err(source) = result {
                #[cfg(feature = "esp32-log")]
                println!("[LedSequencer.shutdown] pin {}: {}", pin.0, source);
                if first_err.is_none() {
                    first_err = Some(SequencerError::Cleanup { pin, source });
                }
            }
        };

        record(button, self.io.unregister_edge_callback(button));
        for pin in self.config.leds.iter() {
            record(pin, self.io.set(pin, Level::Low));
        }
        for pin in self.config.leds.iter() {
            record(pin, self.io.release(pin));
        }
        record(button, self.io.release(button));

        #[cfg(feature = "esp32-log")]
        println!("[LedSequencer.shutdown] LED driver removed");
        first_err.map_or(Ok(()), Err)
    }
}

/// Held for the duration of [`LedSequencer::run`]
///
/// Clears the active flag and reports completion however the worker ends,
/// including when the `run` future is dropped mid-sleep.
struct ActiveWorker<'a> {
    control: &'a Mutex<RefCell<Control>>,
    cancel: &'a Cancellation,
}

impl Drop for ActiveWorker<'_> {
    fn drop(&mut self) {
        critical_section::with(|cs| {
            self.control.borrow(cs).borrow_mut().worker_active = false;
        });
        self.cancel.finish();
    }
}

impl<P: DigitalIo, const N: usize> EdgeHandler for LedSequencer<P, N> {
    fn on_edge(&self, now: Instant) {
        let _ = self.button_handler().handle_edge(now);
    }
}
