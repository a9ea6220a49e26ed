//! GPIO device session over `embedded-hal` digital inputs.
//!
//! Wraps any set of [`InputPin`] implementations (a Linux GPIO character
//! device, a port expander, a test double) and turns level changes seen
//! between polls into [`RawSample`]s on the sample queue.
//!
//! The first read of a pin only seeds its baseline; a sample is pushed
//! once the level differs from the previous successful read.  When the
//! queue is full the baseline is left untouched, so the change is
//! reported again on the next poll with a fresh timestamp.

use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::app::ports::DeviceSession;
use crate::config::PinMode;
use crate::error::SessionError;
use crate::events::{RawSample, SampleSender, push_sample};
use crate::level::Level;

struct Input<P> {
    pin: u16,
    io: P,
    mode: Option<PinMode>,
    level: Option<Level>,
}

/// A [`DeviceSession`] polling `embedded-hal` input pins.
pub struct GpioSession<P: InputPin> {
    inputs: Vec<Input<P>>,
}

impl<P: InputPin> Default for GpioSession<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: InputPin> GpioSession<P> {
    pub fn new() -> Self {
        Self { inputs: Vec::new() }
    }

    /// Attach `io` as pin number `pin`.  Unconfigured pins are not polled.
    pub fn attach(&mut self, pin: u16, io: P) {
        self.inputs.retain(|i| i.pin != pin);
        self.inputs.push(Input {
            pin,
            io,
            mode: None,
            level: None,
        });
    }

    /// Mode recorded for `pin` by [`DeviceSession::set_pin_mode`].
    pub fn mode(&self, pin: u16) -> Option<PinMode> {
        self.inputs.iter().find(|i| i.pin == pin).and_then(|i| i.mode)
    }
}

impl<P: InputPin> DeviceSession for GpioSession<P> {
    fn set_pin_mode(&mut self, pin: u16, mode: PinMode) -> Result<(), SessionError> {
        let input = self
            .inputs
            .iter_mut()
            .find(|i| i.pin == pin)
            .ok_or(SessionError::UnknownPin(pin))?;
        // Pull resistors are fixed when the HAL pin is constructed.
        input.mode = Some(mode);
        debug!("gpio: pin {pin} set to {mode}");
        Ok(())
    }

    fn poll(&mut self, now: f64, tx: &SampleSender<'_>) -> Result<(), SessionError> {
        let mut result = Ok(());
        for input in self.inputs.iter_mut().filter(|i| i.mode.is_some()) {
            let new = match input.io.is_high() {
                Ok(high) => Level::from(high),
                Err(_) => {
                    warn!("gpio: pin {} read failed", input.pin);
                    result = Err(SessionError::PinRead { pin: input.pin });
                    continue;
                }
            };
            match input.level {
                None => input.level = Some(new),
                Some(old) if old != new => {
                    let sample = RawSample {
                        pin: input.pin,
                        old,
                        new,
                        timestamp: now,
                    };
                    match push_sample(tx, sample) {
                        Ok(()) => input.level = Some(new),
                        Err(e) => result = Err(e),
                    }
                }
                Some(_) => {}
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use embedded_hal::digital::{ErrorKind, ErrorType};

    use super::*;
    use crate::events::{SAMPLE_QUEUE_DEPTH, drain_samples, sample_queue};

    /// Input whose level is driven from the test body.
    #[derive(Clone)]
    struct FakePin {
        high: Rc<Cell<Option<bool>>>,
    }

    impl FakePin {
        fn new(high: bool) -> Self {
            Self {
                high: Rc::new(Cell::new(Some(high))),
            }
        }

        fn set(&self, high: Option<bool>) {
            self.high.set(high);
        }
    }

    impl ErrorType for FakePin {
        type Error = ErrorKind;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            self.high.get().ok_or(ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|h| !h)
        }
    }

    #[test]
    fn set_mode_on_unknown_pin_fails() {
        let mut s: GpioSession<FakePin> = GpioSession::new();
        assert_eq!(
            s.set_pin_mode(4, PinMode::Input),
            Err(SessionError::UnknownPin(4))
        );
    }

    #[test]
    fn changes_become_samples() {
        let pin = FakePin::new(false);
        let mut s = GpioSession::new();
        s.attach(5, pin.clone());
        s.set_pin_mode(5, PinMode::Pullup).unwrap();
        assert_eq!(s.mode(5), Some(PinMode::Pullup));

        let queue = sample_queue();
        let tx = queue.sender();
        s.poll(1.0, &tx).unwrap();
        assert!(queue.is_empty(), "first read only seeds the baseline");

        pin.set(Some(true));
        s.poll(2.0, &tx).unwrap();
        s.poll(3.0, &tx).unwrap();

        let mut got = Vec::new();
        drain_samples(&queue.receiver(), |r| got.push(r));
        assert_eq!(
            got,
            vec![RawSample {
                pin: 5,
                old: Level::Low,
                new: Level::High,
                timestamp: 2.0
            }]
        );
    }

    #[test]
    fn unconfigured_pins_are_not_polled() {
        let pin = FakePin::new(false);
        let mut s = GpioSession::new();
        s.attach(1, pin.clone());
        let queue = sample_queue();
        s.poll(1.0, &queue.sender()).unwrap();
        pin.set(Some(true));
        s.poll(2.0, &queue.sender()).unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn read_error_reported_other_pins_still_polled() {
        let bad = FakePin::new(false);
        let good = FakePin::new(false);
        let mut s = GpioSession::new();
        s.attach(1, bad.clone());
        s.attach(2, good.clone());
        s.set_pin_mode(1, PinMode::Input).unwrap();
        s.set_pin_mode(2, PinMode::Input).unwrap();

        let queue = sample_queue();
        let tx = queue.sender();
        s.poll(0.0, &tx).unwrap();

        bad.set(None);
        good.set(Some(true));
        assert_eq!(s.poll(1.0, &tx), Err(SessionError::PinRead { pin: 1 }));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn full_queue_retries_on_next_poll() {
        let pin = FakePin::new(false);
        let mut s = GpioSession::new();
        s.attach(1, pin.clone());
        s.set_pin_mode(1, PinMode::Input).unwrap();

        let queue = sample_queue();
        let tx = queue.sender();
        s.poll(0.0, &tx).unwrap();
        for _ in 0..SAMPLE_QUEUE_DEPTH {
            tx.try_send(RawSample {
                pin: 9,
                old: Level::Low,
                new: Level::High,
                timestamp: 0.0,
            })
            .unwrap();
        }

        pin.set(Some(true));
        assert_eq!(s.poll(1.0, &tx), Err(SessionError::QueueFull));

        drain_samples(&queue.receiver(), |_| {});
        s.poll(2.0, &tx).unwrap();
        let retried = queue.try_receive().unwrap();
        assert_eq!(retried.new, Level::High);
        assert!((retried.timestamp - 2.0).abs() < f64::EPSILON);
    }
}
