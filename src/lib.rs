//! PinPulse library.
//!
//! Turns raw digital pin samples into deduplicated, timestamped state
//! change events carrying duration, change counts and an optional
//! impulses-per-hour rate.  Exposes the pure event logic for integration
//! testing; device access and output live behind the port traits in
//! [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod buffer;
pub mod config;
pub mod error;
pub mod events;
pub mod level;
