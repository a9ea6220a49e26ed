//! Integration tests: textual pin configuration → resolved pin table.

use pinpulse::config::{Field, PinMode, Strategy, Trigger, resolve};
use pinpulse::error::{ConfigError, Error};

#[test]
fn template_and_overrides_combine() {
    let table = resolve(
        "meter:pullup:debounce:falling:1000:kWh",
        &["2", "3:water:input::rising:100:m3", "4::::::Wh"],
    )
    .unwrap();

    assert_eq!(table.len(), 3);

    let p2 = &table[&2];
    assert_eq!(p2.name.as_str(), "meter");
    assert_eq!(p2.mode, PinMode::Pullup);
    assert_eq!(p2.strategy, Strategy::Debounce);
    assert_eq!(p2.trigger, Trigger::Falling);

    let p3 = &table[&3];
    assert_eq!(p3.name.as_str(), "water");
    assert_eq!(p3.mode, PinMode::Input);
    assert_eq!(p3.strategy, Strategy::Debounce, "empty field keeps template");
    assert_eq!(p3.trigger, Trigger::Rising);
    assert!((p3.frequency - 100.0).abs() < f64::EPSILON);

    let p4 = &table[&4];
    assert_eq!(p4.unit.as_str(), "Wh");
    assert!((p4.frequency - 1000.0).abs() < f64::EPSILON);
}

#[test]
fn no_overrides_yields_empty_table() {
    assert!(resolve::<&str>("", &[]).unwrap().is_empty());
}

#[test]
fn error_message_identifies_pin_and_field() {
    let err: Error = resolve("", &["1", "6:::::fast"]).unwrap_err().into();
    assert!(matches!(
        &err,
        Error::Config(ConfigError::InvalidField {
            pin: Some(6),
            field: Field::Frequency,
            ..
        })
    ));
    let msg = err.to_string();
    assert!(msg.contains("pin 6"), "{msg}");
    assert!(msg.contains("frequency"), "{msg}");
    assert!(msg.contains("fast"), "{msg}");
}
