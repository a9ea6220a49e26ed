//! Outbound pin events.
//!
//! The [`Dispatcher`](super::dispatcher::Dispatcher) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them: log them, print JSON, publish them.

use serde::Serialize;

use crate::config::Label;
use crate::level::Level;

/// One reported state change.
///
/// Serialises as a flat object in field order.  `name` is omitted when
/// empty; `rate` and `unit` only appear when a rate was computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinEvent {
    pub pin: u16,
    #[serde(skip_serializing_if = "is_blank")]
    pub name: Label,
    pub value: Level,
    /// Seconds, as supplied with the sample.
    pub timestamp: f64,
    /// Seconds since the reference transition (see [`crate::buffer`]).
    pub duration: f64,
    /// How many times the pin has entered `value`.
    pub count: u64,
    /// Transitions into either level.
    pub total: u64,
    /// Impulses per hour divided by the pin frequency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Label>,
}

fn is_blank(label: &Label) -> bool {
    label.is_empty()
}
