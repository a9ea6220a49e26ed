//! Integration tests: DeviceSession → ObserverService → EventSink.

use super::mock_hw::{ManualClock, MockSession, RecordingSink};

use pinpulse::app::service::ObserverService;
use pinpulse::config::{PinMode, resolve};
use pinpulse::error::{Error, SessionError};
use pinpulse::events::sample_queue;
use pinpulse::level::Level;

fn service(pins: &[&str]) -> ObserverService {
    ObserverService::new(resolve("", pins).unwrap())
}

#[test]
fn start_sets_every_pin_mode() {
    let svc = service(&["2:a:pullup", "5"]);
    let mut session = MockSession::new();
    svc.start(&mut session).unwrap();
    assert_eq!(
        session.modes,
        vec![(2, PinMode::Pullup), (5, PinMode::Input)]
    );
}

#[test]
fn start_propagates_session_failure() {
    let svc = service(&["2"]);
    let mut session = MockSession::new();
    session.reject_pin = Some(2);
    assert_eq!(
        svc.start(&mut session),
        Err(Error::Session(SessionError::UnknownPin(2)))
    );
}

#[test]
fn falling_meter_reports_rate_per_impulse() {
    let mut svc = service(&["3:gas:::falling:1:m3"]);
    let mut session = MockSession::new()
        .then(&[(3, 0, 1)])
        .then(&[(3, 1, 0)])
        .then(&[(3, 0, 1)])
        .then(&[(3, 1, 0)]);
    let clock = ManualClock::at(100.0);
    let queue = sample_queue();
    let (tx, rx) = (queue.sender(), queue.receiver());
    let mut sink = RecordingSink::new();

    svc.start(&mut session).unwrap();
    for step in [0.0, 2.0, 1.0, 3.0] {
        clock.advance(step);
        svc.poll(&mut session, &clock, &tx, &rx, &mut sink).unwrap();
    }

    let events = sink.for_pin(3);
    assert_eq!(events.len(), 2, "only falling edges are reported");
    assert_eq!(events[0].value, Level::Low);
    assert!((events[0].duration - 2.0).abs() < 1e-9);
    assert!((events[0].rate.unwrap() - 1800.0).abs() < 1e-9);
    assert_eq!(events[0].unit.as_deref(), Some("m3"));
    // Second falling edge at 106, previous at 102.
    assert!((events[1].duration - 4.0).abs() < 1e-9);
    assert!((events[1].rate.unwrap() - 900.0).abs() < 1e-9);
    assert_eq!(events[1].total, 4);
    assert_eq!(svc.sample_count(), 4);
}

#[test]
fn debounced_pin_reports_once_per_tick() {
    let mut svc = service(&["4:::debounce", "5"]);
    let mut session = MockSession::new()
        .then(&[(4, 0, 1), (4, 1, 0), (4, 0, 1), (5, 0, 1)])
        .then(&[]);
    let clock = ManualClock::at(10.0);
    let queue = sample_queue();
    let (tx, rx) = (queue.sender(), queue.receiver());
    let mut sink = RecordingSink::new();

    svc.poll(&mut session, &clock, &tx, &rx, &mut sink).unwrap();
    assert_eq!(sink.for_pin(4).len(), 1);
    assert_eq!(sink.for_pin(5).len(), 1);
    assert_eq!(sink.for_pin(4)[0].value, Level::High);

    clock.advance(1.0);
    svc.poll(&mut session, &clock, &tx, &rx, &mut sink).unwrap();
    assert_eq!(sink.events.len(), 2, "quiet tick emits nothing");
    assert_eq!(svc.tick_count(), 2);
}

#[test]
fn repeated_values_and_unknown_pins_are_dropped() {
    let mut svc = service(&["1"]);
    let mut session = MockSession::new().then(&[(1, 1, 1), (9, 0, 1)]);
    let clock = ManualClock::at(0.0);
    let queue = sample_queue();
    let mut sink = RecordingSink::new();

    svc.poll(&mut session, &clock, &queue.sender(), &queue.receiver(), &mut sink)
        .unwrap();
    assert!(sink.events.is_empty());
    assert!(svc.dispatcher().buffer().state(1).is_none());
}
