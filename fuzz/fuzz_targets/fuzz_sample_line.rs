//! Fuzz target: `adapters::replay::parse_line`
//!
//! Arbitrary text must either parse into a sample with a finite timestamp
//! or be rejected with a typed error, never panic.
//!
//! cargo fuzz run fuzz_sample_line

#![no_main]

use libfuzzer_sys::fuzz_target;
use pinpulse::adapters::replay::parse_line;
use pinpulse::app::ports::Clock;

struct ZeroClock;

impl Clock for ZeroClock {
    fn now(&self) -> f64 {
        0.0
    }
}

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Ok(Some(sample)) = parse_line(&text, &ZeroClock) {
        assert!(sample.timestamp.is_finite());
    }
});
