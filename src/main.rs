//! PinPulse host entry point.
//!
//! Reads recorded or piped samples from stdin and reports pin events on
//! stdout (JSON lines) or through the logger.
//!
//! ```text
//! ┌──────────────┐  RawSample  ┌──────────────┐  PinEvent  ┌────────────┐
//! │ SampleReader │────────────▶│ ObserverSvc  │───────────▶│ EventSink  │
//! │ (stdin thrd) │ SampleQueue │ (poll loop)  │            │ json / log │
//! └──────────────┘             └──────────────┘            └────────────┘
//! ```
//!
//! Pin overrides come from `PINPULSE_PINS` and the command-line arguments;
//! see [`ObserverConfig`] for the remaining settings.  `RUST_LOG` controls
//! diagnostics, which go to stderr.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info, warn};

use pinpulse::adapters::json_sink::JsonEventSink;
use pinpulse::adapters::log_sink::LogEventSink;
use pinpulse::adapters::replay::SampleReader;
use pinpulse::adapters::time::SystemClock;
use pinpulse::app::ports::EventSink;
use pinpulse::app::service::ObserverService;
use pinpulse::config::{ObserverConfig, OutputFormat};
use pinpulse::events::sample_queue;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("PinPulse v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Settings and pin table ─────────────────────────────
    let mut cfg = ObserverConfig::from_env().context("reading PINPULSE_* settings")?;
    cfg.pins.extend(std::env::args().skip(1));
    let pins = cfg.resolve_pins().context("resolving pin configuration")?;
    if pins.is_empty() {
        warn!("no pins configured; every sample will be ignored");
    }
    for pin in pins.values() {
        info!("observing {pin}");
    }

    let service = ObserverService::new(pins);
    let interval = Duration::from_millis(u64::from(cfg.poll_interval_ms));

    // ── 2. Run with the selected sink ─────────────────────────
    match cfg.format {
        OutputFormat::Json => run(service, interval, JsonEventSink::new(io::stdout().lock())),
        OutputFormat::Log => run(service, interval, LogEventSink::new()),
    }
}

/// Feed stdin through the observer until input ends.
fn run(mut service: ObserverService, interval: Duration, mut sink: impl EventSink) -> Result<()> {
    let queue = sample_queue();
    let input_done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            let reader = SampleReader::new(io::stdin().lock(), SystemClock::new());
            match reader.run(&queue.sender()) {
                Ok(n) => info!("input closed after {n} samples"),
                Err(e) => error!("reading samples failed: {e}"),
            }
            input_done.store(true, Ordering::Release);
        });

        let rx = queue.receiver();
        loop {
            // Sampled before the tick so the last samples are still drained.
            let finished = input_done.load(Ordering::Acquire);
            service.tick(&rx, &mut sink);
            if finished {
                break;
            }
            thread::sleep(interval);
        }
    });

    info!(
        "stopped after {} ticks, {} samples",
        service.tick_count(),
        service.sample_count()
    );
    Ok(())
}
