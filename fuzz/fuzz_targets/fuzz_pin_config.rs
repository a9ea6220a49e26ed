//! Fuzz target: `config::resolve`
//!
//! Splits arbitrary input into a template and override strings and asserts
//! that resolution never panics and that every resolved pin satisfies the
//! configuration invariants.
//!
//! cargo fuzz run fuzz_pin_config

#![no_main]

use libfuzzer_sys::fuzz_target;
use pinpulse::config::resolve;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let mut parts = text.split('\n');
    let template = parts.next().unwrap_or_default();
    let overrides: Vec<&str> = parts.collect();

    if let Ok(table) = resolve(template, overrides.as_slice()) {
        for (pin, cfg) in &table {
            assert_eq!(*pin, cfg.pin);
            assert!(cfg.frequency.is_finite() && cfg.frequency > 0.0);
        }
        // Resolution is pure.
        assert_eq!(resolve(template, overrides.as_slice()).ok(), Some(table));
    }
});
