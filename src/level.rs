//! Binary pin levels and timestamped samples.

use serde::{Serialize, Serializer};

/// Logic level of a digital input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Low = 0,
    High = 1,
}

impl Level {
    /// The other level.
    pub const fn inverted(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }

    /// Index into per-level tables (`0` or `1`).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse the wire form `0` / `1`.
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Low),
            1 => Some(Self::High),
            _ => None,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// A raw observation: the level a pin changed to and when, in seconds.
///
/// Timestamps come from the caller's clock; the reducer never reads time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: Level,
    pub timestamp: f64,
}

impl Sample {
    pub const fn new(value: Level, timestamp: f64) -> Self {
        Self { value, timestamp }
    }
}
