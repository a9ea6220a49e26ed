//! Mock adapters for integration tests.
//!
//! `MockSession` records every mode request and replays scripted level
//! changes; `RecordingSink` keeps every emitted event for assertions.

use std::collections::VecDeque;

use pinpulse::app::events::PinEvent;
use pinpulse::app::ports::{Clock, DeviceSession, EventSink};
use pinpulse::config::PinMode;
use pinpulse::error::SessionError;
use pinpulse::events::{RawSample, SampleSender, push_sample};
use pinpulse::level::Level;

// ── MockSession ───────────────────────────────────────────────

pub struct MockSession {
    pub modes: Vec<(u16, PinMode)>,
    /// Changes delivered on successive polls, one batch per poll.
    pub script: VecDeque<Vec<(u16, Level, Level)>>,
    pub reject_pin: Option<u16>,
}

#[allow(dead_code)]
impl MockSession {
    pub fn new() -> Self {
        Self {
            modes: Vec::new(),
            script: VecDeque::new(),
            reject_pin: None,
        }
    }

    pub fn then(mut self, batch: &[(u16, u8, u8)]) -> Self {
        let batch = batch
            .iter()
            .map(|&(pin, old, new)| {
                (
                    pin,
                    Level::from_u8(old).unwrap(),
                    Level::from_u8(new).unwrap(),
                )
            })
            .collect();
        self.script.push_back(batch);
        self
    }
}

impl DeviceSession for MockSession {
    fn set_pin_mode(&mut self, pin: u16, mode: PinMode) -> Result<(), SessionError> {
        if self.reject_pin == Some(pin) {
            return Err(SessionError::UnknownPin(pin));
        }
        self.modes.push((pin, mode));
        Ok(())
    }

    fn poll(&mut self, now: f64, tx: &SampleSender<'_>) -> Result<(), SessionError> {
        for (pin, old, new) in self.script.pop_front().unwrap_or_default() {
            push_sample(
                tx,
                RawSample {
                    pin,
                    old,
                    new,
                    timestamp: now,
                },
            )?;
        }
        Ok(())
    }
}

// ── ManualClock ───────────────────────────────────────────────

pub struct ManualClock(pub std::cell::Cell<f64>);

#[allow(dead_code)]
impl ManualClock {
    pub fn at(t: f64) -> Self {
        Self(std::cell::Cell::new(t))
    }

    pub fn advance(&self, secs: f64) {
        self.0.set(self.0.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.0.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<PinEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_pin(&self, pin: u16) -> Vec<&PinEvent> {
        self.events.iter().filter(|e| e.pin == pin).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &PinEvent) {
        self.events.push(event.clone());
    }
}
