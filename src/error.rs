//! Unified error types for PinPulse.
//!
//! A single `Error` enum that every subsystem converts into, so the binary's
//! startup path handles configuration and session failures uniformly.
//! Stale samples and trigger-suppressed events are normal outcomes of the
//! reducer and never appear here.

use core::fmt;

use crate::config::Field;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Pin configuration text could not be resolved.
    Config(ConfigError),
    /// The device session failed to configure or read a pin.
    Session(SessionError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Session(e) => write!(f, "session: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Fatal at startup: the observer never starts with a bad pin table.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The pin field is missing or not a non-negative integer.
    InvalidPin { value: String },
    /// An enumerated or numeric field holds a value outside its domain.
    /// `pin` is `None` when the offending string is the template.
    InvalidField {
        pin: Option<u16>,
        field: Field,
        value: String,
    },
    /// More colon-separated fields than the grammar allows.
    TooManyFields { pin: Option<u16>, count: usize },
    /// A name or unit does not fit in a [`Label`](crate::config::Label).
    LabelTooLong {
        pin: Option<u16>,
        field: Field,
        value: String,
    },
    /// The same pin number appears in two overrides.
    DuplicatePin(u16),
    /// A runtime setting (environment variable) holds an unusable value.
    InvalidSetting { key: &'static str, value: String },
}

/// Renders `pin 4` or `template` for error messages.
struct Origin(Option<u16>);

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(pin) => write!(f, "pin {pin}"),
            None => write!(f, "template"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin { value } => {
                write!(f, "invalid pin number {value:?}: expected a non-negative integer")
            }
            Self::InvalidField { pin, field, value } => {
                write!(f, "{}: invalid {field} {value:?}", Origin(*pin))?;
                match field.allowed() {
                    Some(allowed) => write!(f, " (expected one of: {allowed})"),
                    None => Ok(()),
                }
            }
            Self::TooManyFields { pin, count } => {
                write!(f, "{}: too many fields ({count})", Origin(*pin))
            }
            Self::LabelTooLong { pin, field, value } => {
                write!(f, "{}: {field} {value:?} is too long", Origin(*pin))
            }
            Self::DuplicatePin(pin) => write!(f, "pin {pin} configured more than once"),
            Self::InvalidSetting { key, value } => write!(f, "invalid {key} {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Reading a pin level failed in the HAL.
    PinRead { pin: u16 },
    /// The session was asked about a pin it does not drive.
    UnknownPin(u16),
    /// The sample queue is full; the sample was not delivered.
    QueueFull,
    /// A replayed sample line could not be parsed.
    Parse { line: String, reason: &'static str },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinRead { pin } => write!(f, "reading pin {pin} failed"),
            Self::UnknownPin(pin) => write!(f, "pin {pin} is not attached to this session"),
            Self::QueueFull => write!(f, "sample queue full"),
            Self::Parse { line, reason } => write!(f, "bad sample line {line:?}: {reason}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<SessionError> for Error {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
