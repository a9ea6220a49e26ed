//! JSON-lines event sink adapter.
//!
//! Writes one compact JSON object per event to any [`std::io::Write`],
//! flushing after each line so a downstream reader (pipe, log shipper,
//! publisher) sees events as they happen.  Write failures are logged and
//! the event is dropped; the poll loop keeps running.

use std::io::Write;

use log::warn;

use crate::app::events::PinEvent;
use crate::app::ports::EventSink;

pub struct JsonEventSink<W: Write> {
    out: W,
}

impl<W: Write> JsonEventSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, event: &PinEvent) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> EventSink for JsonEventSink<W> {
    fn emit(&mut self, event: &PinEvent) {
        if let Err(e) = self.write_event(event) {
            warn!("pin {}: event not written: {}", event.pin, e);
        }
    }
}
