//! Inbound sample queue.
//!
//! Samples are produced by:
//! - a [`DeviceSession`](crate::app::ports::DeviceSession) polling hardware
//! - the replay reader parsing recorded sample lines
//!
//! and consumed by the poll loop, which hands them to the dispatcher one at
//! a time in arrival order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ GPIO session│────▶│              │     │              │
//! │ Replay      │────▶│ SampleQueue  │────▶│  Poll loop   │
//! │ reader      │     │  (bounded)   │     │ (dispatcher) │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender, TrySendError};

use crate::error::SessionError;
use crate::level::{Level, Sample};

/// Maximum number of undelivered samples.
pub const SAMPLE_QUEUE_DEPTH: usize = 64;

/// A value change reported by the device session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub pin: u16,
    pub old: Level,
    pub new: Level,
    /// Seconds, from the session's clock.
    pub timestamp: f64,
}

impl RawSample {
    /// Whether the sample reports an actual change of level.
    pub fn is_change(&self) -> bool {
        self.old != self.new
    }

    /// The observation handed to the edge buffer.
    pub fn sample(&self) -> Sample {
        Sample::new(self.new, self.timestamp)
    }
}

/// Bounded channel carrying samples from sessions to the poll loop.
pub type SampleQueue = Channel<CriticalSectionRawMutex, RawSample, SAMPLE_QUEUE_DEPTH>;

/// Producer half, held by device sessions.
pub type SampleSender<'a> = Sender<'a, CriticalSectionRawMutex, RawSample, SAMPLE_QUEUE_DEPTH>;

/// Consumer half, held by the poll loop.
pub type SampleReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, RawSample, SAMPLE_QUEUE_DEPTH>;

/// Create an empty queue.
pub const fn sample_queue() -> SampleQueue {
    Channel::new()
}

/// Push a sample without blocking.
pub fn push_sample(tx: &SampleSender<'_>, sample: RawSample) -> Result<(), SessionError> {
    tx.try_send(sample).map_err(|TrySendError::Full(_)| SessionError::QueueFull)
}

/// Drain all pending samples into `handler`, in FIFO order.
pub fn drain_samples(rx: &SampleReceiver<'_>, mut handler: impl FnMut(RawSample)) {
    while let Ok(sample) = rx.try_receive() {
        handler(sample);
    }
}
