//! Reporting strategy dispatcher.
//!
//! Routes samples into the [`EdgeBuffer`] according to each pin's
//! [`Strategy`]:
//!
//! | Strategy   | On sample                  | On poll tick           |
//! |------------|----------------------------|------------------------|
//! | `instant`  | accept, reduce, emit       | nothing                |
//! | `debounce` | accept (latest wins)       | reduce, emit (≤1/pin)  |

use std::collections::BTreeMap;

use log::debug;

use crate::buffer::EdgeBuffer;
use crate::config::{PinConfig, Strategy};
use crate::events::RawSample;

use super::ports::EventSink;

/// Owns the read-only pin table and the mutable edge buffer.
pub struct Dispatcher {
    pins: BTreeMap<u16, PinConfig>,
    buffer: EdgeBuffer,
}

impl Dispatcher {
    pub fn new(pins: BTreeMap<u16, PinConfig>) -> Self {
        Self {
            pins,
            buffer: EdgeBuffer::new(),
        }
    }

    /// Pin table this dispatcher routes for.
    pub fn pins(&self) -> &BTreeMap<u16, PinConfig> {
        &self.pins
    }

    /// Edge buffer state, for diagnostics.
    pub fn buffer(&self) -> &EdgeBuffer {
        &self.buffer
    }

    /// Handle one sample from the device session.
    ///
    /// Non-changes and unconfigured pins are dropped.  Instant pins are
    /// reduced immediately; debounced pins wait for [`flush`](Self::flush).
    pub fn on_sample(&mut self, raw: RawSample, sink: &mut impl EventSink) {
        if !raw.is_change() {
            debug!("pin {}: repeated value {} ignored", raw.pin, raw.new as u8);
            return;
        }
        let Some(cfg) = self.pins.get(&raw.pin) else {
            debug!("pin {}: not configured, sample ignored", raw.pin);
            return;
        };

        self.buffer.accept(raw.pin, raw.sample());
        if cfg.strategy == Strategy::Instant {
            if let Some(event) = self.buffer.reduce(cfg) {
                sink.emit(&event);
            }
        }
    }

    /// Poll tick: reduce every debounced pin once.
    pub fn flush(&mut self, sink: &mut impl EventSink) {
        for cfg in self.pins.values() {
            if cfg.strategy != Strategy::Debounce {
                continue;
            }
            if let Some(event) = self.buffer.reduce(cfg) {
                sink.emit(&event);
            }
        }
    }
}
