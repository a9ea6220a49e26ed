//! Recorded-sample reader.
//!
//! Parses whitespace-separated sample lines and pushes them onto the
//! sample queue, standing in for a live device session when samples come
//! from a capture file, a pipe, or another process:
//!
//! ```text
//! # pin old new [timestamp]
//! 4 1 0 1700000000.125
//! 4 0 1
//! ```
//!
//! A missing timestamp is filled from the reader's [`Clock`].  Blank lines
//! and `#` comments are skipped; malformed lines are logged and skipped.

use std::io::BufRead;
use std::time::Duration;

use log::warn;

use crate::app::ports::Clock;
use crate::error::SessionError;
use crate::events::{RawSample, SampleSender, push_sample};
use crate::level::Level;

/// Back-off while the poll loop drains a full queue.
const QUEUE_FULL_BACKOFF: Duration = Duration::from_millis(1);

/// Parse one sample line.  `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str, clock: &impl Clock) -> Result<Option<RawSample>, SessionError> {
    let text = line.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }
    let bad = |reason| SessionError::Parse {
        line: text.to_owned(),
        reason,
    };

    let mut fields = text.split_whitespace();
    let pin = fields
        .next()
        .and_then(|f| f.parse::<u16>().ok())
        .ok_or_else(|| bad("pin must be a non-negative integer"))?;
    let mut level = || {
        fields
            .next()
            .and_then(|f| f.parse::<u8>().ok())
            .and_then(Level::from_u8)
            .ok_or_else(|| bad("level must be 0 or 1"))
    };
    let old = level()?;
    let new = level()?;
    let timestamp = match fields.next() {
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite())
            .ok_or_else(|| bad("timestamp must be a number"))?,
        None => clock.now(),
    };
    if fields.next().is_some() {
        return Err(bad("too many fields"));
    }

    Ok(Some(RawSample {
        pin,
        old,
        new,
        timestamp,
    }))
}

/// Reads sample lines from `R` until end of input.
pub struct SampleReader<R, C> {
    input: R,
    clock: C,
}

impl<R: BufRead, C: Clock> SampleReader<R, C> {
    pub fn new(input: R, clock: C) -> Self {
        Self { input, clock }
    }

    /// Push every parsed sample onto the queue, waiting while it is full.
    /// Returns the number of samples delivered.
    pub fn run(self, tx: &SampleSender<'_>) -> std::io::Result<u64> {
        let mut delivered = 0;
        for line in self.input.lines() {
            let line = line?;
            let sample = match parse_line(&line, &self.clock) {
                Ok(Some(sample)) => sample,
                Ok(None) => continue,
                Err(e) => {
                    warn!("replay: {e}");
                    continue;
                }
            };
            while let Err(SessionError::QueueFull) = push_sample(tx, sample) {
                std::thread::sleep(QUEUE_FULL_BACKOFF);
            }
            delivered += 1;
        }
        Ok(delivered)
    }
}
