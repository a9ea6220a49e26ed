//! Port traits: the boundary between the event core and the outside world.
//!
//! ```text
//!   DeviceSession ──▶ SampleQueue ──▶ Dispatcher ──▶ EventSink
//! ```
//!
//! Driven adapters (device sessions, event sinks, clocks) implement these
//! traits.  The [`ObserverService`](super::service::ObserverService) and
//! [`Dispatcher`](super::dispatcher::Dispatcher) consume them via generics,
//! so the core never touches hardware or output formats directly.

use crate::config::PinMode;
use crate::error::SessionError;
use crate::events::SampleSender;

use super::events::PinEvent;

// ───────────────────────────────────────────────────────────────
// Device session (driven adapter: hardware → core)
// ───────────────────────────────────────────────────────────────

/// A connection to the device whose digital inputs are observed.
pub trait DeviceSession {
    /// Put `pin` into the requested input mode.
    fn set_pin_mode(&mut self, pin: u16, mode: PinMode) -> Result<(), SessionError>;

    /// Poll the device once and push a sample for every pin whose level
    /// changed since the previous poll.  `now` stamps those samples.
    fn poll(&mut self, now: f64, tx: &SampleSender<'_>) -> Result<(), SessionError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: core → output)
// ───────────────────────────────────────────────────────────────

/// Receives every reported [`PinEvent`].  Serialisation and delivery are
/// the sink's business.
pub trait EventSink {
    fn emit(&mut self, event: &PinEvent);
}

impl EventSink for Vec<PinEvent> {
    fn emit(&mut self, event: &PinEvent) {
        self.push(event.clone());
    }
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Source of sample timestamps, in seconds.
pub trait Clock {
    fn now(&self) -> f64;
}
