//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter     | Implements     | Connects to                      |
//! |-------------|----------------|----------------------------------|
//! | `gpio`      | DeviceSession  | `embedded-hal` input pins        |
//! | `json_sink` | EventSink      | JSON lines on any `io::Write`    |
//! | `log_sink`  | EventSink      | `log` facade                     |
//! | `replay`    | (queue feeder) | Recorded `pin old new [t]` lines |
//! | `time`      | Clock          | System wall clock                |

pub mod gpio;
pub mod json_sink;
pub mod log_sink;
pub mod replay;
pub mod time;
