//! Observer service: the poll-loop core.
//!
//! [`ObserverService`] owns the [`Dispatcher`] and exposes a
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, so the whole service is testable with mock adapters.
//!
//! ```text
//!  DeviceSession ──▶ ┌────────────────────────┐ ──▶ EventSink
//!   (SampleQueue)    │    ObserverService     │
//!                    │ Dispatcher · EdgeBuffer│
//!                    └────────────────────────┘
//! ```

use std::collections::BTreeMap;

use log::{debug, info};

use crate::config::PinConfig;
use crate::error::Result;
use crate::events::{SampleReceiver, SampleSender, drain_samples};

use super::dispatcher::Dispatcher;
use super::ports::{Clock, DeviceSession, EventSink};

/// The observer orchestrates the dispatcher across poll ticks.
pub struct ObserverService {
    dispatcher: Dispatcher,
    tick_count: u64,
    sample_count: u64,
}

impl ObserverService {
    /// Construct the service from a resolved pin table.
    pub fn new(pins: BTreeMap<u16, PinConfig>) -> Self {
        Self {
            dispatcher: Dispatcher::new(pins),
            tick_count: 0,
            sample_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put every configured pin into its input mode.
    pub fn start(&self, session: &mut impl DeviceSession) -> Result<()> {
        for cfg in self.dispatcher.pins().values() {
            session.set_pin_mode(cfg.pin, cfg.mode)?;
            info!("observing {cfg}");
        }
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Poll `session` once, then run a [`tick`](Self::tick).
    pub fn poll(
        &mut self,
        session: &mut impl DeviceSession,
        clock: &impl Clock,
        tx: &SampleSender<'_>,
        rx: &SampleReceiver<'_>,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        session.poll(clock.now(), tx)?;
        self.tick(rx, sink);
        Ok(())
    }

    /// Drain queued samples through the dispatcher, then flush debounced
    /// pins once.
    pub fn tick(&mut self, rx: &SampleReceiver<'_>, sink: &mut impl EventSink) {
        self.tick_count += 1;
        let dispatcher = &mut self.dispatcher;
        let mut drained = 0u64;
        drain_samples(rx, |raw| {
            drained += 1;
            dispatcher.on_sample(raw, &mut *sink);
        });
        self.sample_count += drained;
        self.dispatcher.flush(sink);
        if drained > 0 {
            debug!("tick {}: {} samples", self.tick_count, drained);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Samples received from the queue since start.
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }
}
