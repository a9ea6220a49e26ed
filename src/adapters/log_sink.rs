//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each [`PinEvent`] to the `log`
//! facade at `info` level.  Useful when stdout is reserved or when events
//! only need to appear alongside other diagnostics.

use log::info;

use crate::app::events::PinEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`PinEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// Single-line rendering used by [`LogEventSink`].
pub fn render(e: &PinEvent) -> String {
    let mut line = format!(
        "EVENT | pin={} name={:?} | value={} t={:.9} | dur={:.9}s | count={} total={}",
        e.pin,
        e.name.as_str(),
        e.value as u8,
        e.timestamp,
        e.duration,
        e.count,
        e.total,
    );
    if let Some(rate) = e.rate {
        line.push_str(&format!(" | rate={rate}"));
        if let Some(unit) = &e.unit {
            line.push_str(&format!(" {unit}"));
        }
    }
    line
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &PinEvent) {
        info!("{}", render(event));
    }
}
