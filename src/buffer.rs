//! Per-pin edge buffer and event reducer.
//!
//! Each observed pin owns a [`PinState`]: the latest not-yet-reduced sample
//! plus, for each level, when the pin last entered it and how many times.
//! [`EdgeBuffer::accept`] only parks a sample; [`EdgeBuffer::reduce`] turns
//! the parked sample into at most one [`PinEvent`].
//!
//! ```text
//!   accept(s1) accept(s2) accept(s3)        reduce()
//!   ──────────────────────────────────▶  current = s3 ──▶ Event(s3)
//!        (later samples overwrite)          │
//!                                           ▼
//!                               last[Low] / last[High] marks
//! ```
//!
//! ## Duration
//!
//! | Trigger              | Duration                                   |
//! |----------------------|--------------------------------------------|
//! | `any`                | since the last transition of either kind   |
//! | `none/falling/rising`| since the pin last entered the same level  |
//!
//! The buffer is not shared between threads: the poll loop that owns it is
//! the only writer, which serialises `accept`/`reduce` for every pin.

use std::collections::BTreeMap;

use log::debug;

use crate::app::events::PinEvent;
use crate::config::{PinConfig, Trigger};
use crate::level::Sample;

/// Seconds per hour; the rate is expressed in impulses per hour.
const SECS_PER_HOUR: f64 = 3600.0;

/// When a pin last entered one level, and how often it has.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mark {
    /// `None` until the level is first observed.
    pub at: Option<f64>,
    /// Only ever increases.
    pub count: u64,
}

/// Mutable per-pin record held by the [`EdgeBuffer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinState {
    /// Pending sample, overwritten by every `accept`.
    pub current: Option<Sample>,
    /// Indexed by [`Level::index`](crate::level::Level::index).
    pub last: [Mark; 2],
    /// Samples dropped by the stale-sample guard.
    pub stale_discards: u64,
}

impl PinState {
    /// Cumulative transitions recorded for this pin.
    pub fn total(&self) -> u64 {
        self.last[0].count + self.last[1].count
    }
}

/// Arena of per-pin states, created lazily on a pin's first sample.
#[derive(Debug, Default)]
pub struct EdgeBuffer {
    pins: BTreeMap<u16, PinState>,
}

impl EdgeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `sample` as the pin's pending sample.  Only the latest pending
    /// sample survives until the next [`reduce`](Self::reduce).
    pub fn accept(&mut self, pin: u16, sample: Sample) {
        self.pins.entry(pin).or_default().current = Some(sample);
    }

    /// Consume the pending sample for `cfg.pin` and build its event.
    ///
    /// Returns `None` when nothing is pending, when the sample is a stale
    /// repeat, or when the pin has a trigger the transition does not match.
    pub fn reduce(&mut self, cfg: &PinConfig) -> Option<PinEvent> {
        let state = self.pins.get_mut(&cfg.pin)?;
        let sample = state.current.take()?;
        let value = sample.value;
        let t = sample.timestamp;

        let change_ts = state.last[value.inverted().index()].at.unwrap_or(t);
        let prev_ts = state.last[value.index()].at.unwrap_or(change_ts);
        state.last[value.index()].at = Some(t);

        if prev_ts > change_ts {
            state.stale_discards += 1;
            debug!(
                "pin {}: stale sample value={} t={:.9} (same level at {:.9}, opposite at {:.9}), discarded [{} total]",
                cfg.pin, value as u8, t, prev_ts, change_ts, state.stale_discards
            );
            return None;
        }

        state.last[value.index()].count += 1;
        let count = state.last[value.index()].count;
        let total = state.total();

        let duration = if cfg.trigger == Trigger::Any {
            t - change_ts
        } else {
            t - prev_ts
        };

        let mut event = PinEvent {
            pin: cfg.pin,
            name: cfg.name.clone(),
            value,
            timestamp: t,
            duration,
            count,
            total,
            rate: None,
            unit: None,
        };

        if cfg.trigger.matches(value) {
            if duration > 0.0 {
                event.rate = Some(SECS_PER_HOUR / (cfg.frequency * duration));
                event.unit = (!cfg.unit.is_empty()).then(|| cfg.unit.clone());
            }
        } else if cfg.trigger != Trigger::None {
            debug!(
                "pin {}: value={} does not match trigger {}, suppressed",
                cfg.pin, value as u8, cfg.trigger
            );
            return None;
        }

        Some(event)
    }

    /// Whether `pin` has a sample waiting for [`reduce`](Self::reduce).
    pub fn has_pending(&self, pin: u16) -> bool {
        self.pins.get(&pin).is_some_and(|s| s.current.is_some())
    }

    /// Read-only view of a pin's state, if it has seen a sample.
    pub fn state(&self, pin: u16) -> Option<&PinState> {
        self.pins.get(&pin)
    }

    /// Samples discarded as stale for `pin`.
    pub fn stale_discards(&self, pin: u16) -> u64 {
        self.pins.get(&pin).map_or(0, |s| s.stale_discards)
    }
}
