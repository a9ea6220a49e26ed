//! Application core: pure event logic, zero I/O.
//!
//! This module routes samples to the edge buffer and hands the resulting
//! events to the outside world.  All interaction with devices and output
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real hardware.

pub mod dispatcher;
pub mod events;
pub mod ports;
pub mod service;
